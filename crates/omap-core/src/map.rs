//! The [`ObjectMap`] facade over the path, reference and extent indexes.

use std::collections::BTreeSet;

use omap_extent::ExtentMap;
use omap_path::{NavNode, PathIndex};
use omap_refs::{Adjacency, ReferenceMap};
use omap_types::{ObjectId, ObjectPath, ReferenceType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocator::IdAllocator;
use crate::config::ObjectMapConfig;
use crate::error::{OmapError, OmapResult};
use crate::location::Location;
use crate::property::Orientation;
use crate::resource::{Resolver, Resource};

/// Depth of a navigation tree that lists only the immediate children.
pub const DEFAULT_NAV_DEPTH: usize = 1;

/// Flags for [`ObjectMap::add`].
///
/// `moving` re-registers an object that keeps its oid under a new path.
/// `duplicating` forces a fresh oid even if the object already carries one.
/// The two are mutually exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddOptions {
    pub duplicating: bool,
    pub moving: bool,
}

impl AddOptions {
    pub fn duplicating() -> Self {
        Self {
            duplicating: true,
            moving: false,
        }
    }

    pub fn moving() -> Self {
        Self {
            duplicating: false,
            moving: true,
        }
    }
}

/// The live references of one object under one reference type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReferenceSummary {
    pub reftype: ReferenceType,
    /// Paths the object refers to.
    pub targets: Vec<ObjectPath>,
    /// Paths that refer to the object.
    pub sources: Vec<ObjectPath>,
}

/// Identity, location, reference and extent bookkeeping for one tree.
///
/// The map never owns the objects it indexes. Objects are passed in as
/// [`Resource`]s when they enter the tree and are materialized again through
/// a caller-supplied [`Resolver`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectMap {
    config: ObjectMapConfig,
    paths: PathIndex,
    references: ReferenceMap,
    extents: ExtentMap,
    #[serde(skip)]
    pub(crate) allocator: IdAllocator,
}

impl PartialEq for ObjectMap {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.paths == other.paths
            && self.references == other.references
            && self.extents == other.extents
    }
}

impl Eq for ObjectMap {}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ObjectMapConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ObjectMapConfig {
        &self.config
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path_index(&self) -> &PathIndex {
        &self.paths
    }

    pub fn reference_map(&self) -> &ReferenceMap {
        &self.references
    }

    pub fn extent_map(&self) -> &ExtentMap {
        &self.extents
    }

    /// Discard the allocator cursor, e.g. after an aborted transaction.
    pub fn reset_allocator(&mut self) {
        self.allocator.reset();
    }

    // ---- Location dispatch ----

    /// Resolve a location to the path it names.
    ///
    /// Resources answer with their own lineage. Oids must be live.
    pub fn resolve_path<'a>(&self, loc: impl Into<Location<'a>>) -> OmapResult<ObjectPath> {
        let loc = loc.into();
        match loc {
            Location::Path(path) => Ok(path.clone()),
            Location::Resource(resource) => resource
                .path()
                .ok_or_else(|| OmapError::InvalidArgument(format!("{loc} has no path"))),
            Location::Oid(oid) => self
                .paths
                .path_for(oid)
                .cloned()
                .ok_or_else(|| OmapError::UnknownEndpoint(loc.to_string())),
        }
    }

    /// Resolve a location to a live oid.
    pub fn resolve_oid<'a>(&self, loc: impl Into<Location<'a>>) -> OmapResult<ObjectId> {
        let loc = loc.into();
        let oid = match loc {
            Location::Oid(oid) => Some(oid),
            Location::Path(path) => self.paths.oid_for(path),
            Location::Resource(resource) => resource.oid(),
        };
        oid.filter(|oid| self.paths.contains_oid(*oid))
            .ok_or_else(|| OmapError::UnknownEndpoint(loc.to_string()))
    }

    fn resolve_oids(&self, items: &[Location<'_>]) -> OmapResult<Vec<ObjectId>> {
        items.iter().map(|item| self.resolve_oid(*item)).collect()
    }

    // ---- Identity ----

    /// Allocate an oid that is not live and not reserved.
    pub fn new_objectid(&mut self) -> ObjectId {
        let paths = &self.paths;
        self.allocator
            .allocate(self.config.family, |oid| paths.contains_oid(oid))
    }

    /// Register `obj` at `path`, assigning it an oid if needed.
    ///
    /// Nothing is modified, `obj` included, unless the call succeeds.
    pub fn add<R>(
        &mut self,
        obj: &mut R,
        path: &ObjectPath,
        options: AddOptions,
    ) -> OmapResult<ObjectId>
    where
        R: Resource + ?Sized,
    {
        if options.moving && options.duplicating {
            return Err(OmapError::InvalidCombination);
        }

        // A live oid is reported ahead of a live path.
        let existing = match obj.oid().filter(|_| !options.duplicating) {
            Some(oid) if oid.is_reserved() => {
                return Err(OmapError::InvalidArgument(format!(
                    "objectid {oid} is reserved"
                )))
            }
            Some(oid) if self.paths.contains_oid(oid) => return Err(OmapError::DuplicateOid(oid)),
            existing => existing,
        };
        if self.paths.contains_path(path) {
            return Err(OmapError::DuplicatePath(path.clone()));
        }

        let (oid, fresh) = match existing {
            Some(oid) => (oid, false),
            None => (self.new_objectid(), true),
        };

        self.paths.add_path(oid, path)?;
        if !options.moving {
            self.extents.add(oid, obj.type_name());
        }
        if fresh {
            obj.set_oid(oid);
        }
        debug!(%oid, %path, extent = obj.type_name(), moving = options.moving, "added object");
        Ok(oid)
    }

    /// Remove the subtree at `loc`, returning every oid that left the map.
    ///
    /// Unless `moving`, the removed oids also lose their references and
    /// extent memberships.
    pub fn remove<'a>(
        &mut self,
        loc: impl Into<Location<'a>>,
        moving: bool,
    ) -> OmapResult<BTreeSet<ObjectId>> {
        let path = self.resolve_path(loc)?;
        let removed = self.paths.remove_subtree(&path);
        if !moving {
            self.references.remove(&removed);
            self.extents.remove(&removed);
        }
        debug!(%path, removed = removed.len(), moving, "removed subtree");
        Ok(removed)
    }

    /// Re-home the live subtree at `from` under `to`.
    ///
    /// Every node keeps its oid, extents and references. Returns the moved
    /// oids.
    pub fn move_subtree<'a>(
        &mut self,
        from: impl Into<Location<'a>>,
        to: &ObjectPath,
    ) -> OmapResult<BTreeSet<ObjectId>> {
        let from = self.resolve_path(from)?;
        if !self.paths.contains_path(&from) {
            return Err(OmapError::UnknownEndpoint(format!("path {from}")));
        }
        if from.is_prefix_of(to) {
            return Err(OmapError::InvalidArgument(format!(
                "cannot move {from} into its own subtree {to}"
            )));
        }
        if self.paths.contains_path(to) {
            return Err(OmapError::DuplicatePath(to.clone()));
        }

        let moving = self.paths.lookup(&from, None, true);
        let mut rebased = Vec::with_capacity(moving.len());
        for &oid in &moving {
            let Some(new_path) = self
                .paths
                .path_for(oid)
                .and_then(|path| path.rebase(&from, to))
            else {
                continue;
            };
            if let Some(occupant) = self.paths.oid_for(&new_path) {
                if !moving.contains(&occupant) {
                    return Err(OmapError::DuplicatePath(new_path));
                }
            }
            rebased.push((oid, new_path));
        }

        let removed = self.remove(Location::Path(&from), true)?;
        for (oid, path) in &rebased {
            self.paths.add_path(*oid, path)?;
        }
        debug!(%from, %to, moved = removed.len(), "moved subtree");
        Ok(removed)
    }

    /// The oid registered at `loc`, if any.
    pub fn objectid_for<'a>(&self, loc: impl Into<Location<'a>>) -> OmapResult<Option<ObjectId>> {
        match loc.into() {
            Location::Oid(oid) => Ok(self.paths.contains_oid(oid).then_some(oid)),
            Location::Path(path) => Ok(self.paths.oid_for(path)),
            loc @ Location::Resource(resource) => {
                let path = resource
                    .path()
                    .ok_or_else(|| OmapError::InvalidArgument(format!("{loc} has no path")))?;
                Ok(self.paths.oid_for(&path))
            }
        }
    }

    pub fn path_for(&self, oid: ObjectId) -> Option<&ObjectPath> {
        self.paths.path_for(oid)
    }

    /// Materialize the object at an oid or path through `resolver`.
    ///
    /// Unknown oids and stale paths yield `None`.
    pub fn object_for<'a, R: Resolver>(
        &self,
        resolver: &R,
        loc: impl Into<Location<'a>>,
    ) -> OmapResult<Option<R::Object>> {
        match loc.into() {
            Location::Oid(oid) => Ok(self.resolve_with(resolver, oid)),
            Location::Path(path) => Ok(resolver.resolve(path)),
            loc @ Location::Resource(_) => Err(OmapError::InvalidArgument(format!(
                "{loc}: expected an objectid or a path"
            ))),
        }
    }

    fn resolve_with<R: Resolver>(&self, resolver: &R, oid: ObjectId) -> Option<R::Object> {
        self.paths
            .path_for(oid)
            .and_then(|path| resolver.resolve(path))
    }

    // ---- Path queries ----

    /// Oids under `loc`, `depth` levels deep (unbounded when `None`).
    pub fn pathlookup<'a>(
        &self,
        loc: impl Into<Location<'a>>,
        depth: Option<usize>,
        include_origin: bool,
    ) -> OmapResult<BTreeSet<ObjectId>> {
        let path = self.resolve_path(loc)?;
        Ok(self.paths.lookup(&path, depth, include_origin))
    }

    pub fn pathcount<'a>(
        &self,
        loc: impl Into<Location<'a>>,
        depth: Option<usize>,
        include_origin: bool,
    ) -> OmapResult<usize> {
        let path = self.resolve_path(loc)?;
        Ok(self.paths.count(&path, depth, include_origin))
    }

    /// Navigation nodes below `loc`, `depth` levels deep.
    ///
    /// Most callers want the immediate children, [`DEFAULT_NAV_DEPTH`].
    pub fn navtree<'a>(
        &self,
        loc: impl Into<Location<'a>>,
        depth: usize,
    ) -> OmapResult<Vec<NavNode>> {
        let path = self.resolve_path(loc)?;
        Ok(self.paths.children_tree(&path, depth))
    }

    // ---- References ----

    pub fn connect<'s, 't>(
        &mut self,
        source: impl Into<Location<'s>>,
        target: impl Into<Location<'t>>,
        reftype: &ReferenceType,
    ) -> OmapResult<()> {
        let source = self.resolve_oid(source)?;
        let target = self.resolve_oid(target)?;
        self.references.connect(source, target, reftype);
        debug!(%source, %target, %reftype, "connected");
        Ok(())
    }

    pub fn disconnect<'s, 't>(
        &mut self,
        source: impl Into<Location<'s>>,
        target: impl Into<Location<'t>>,
        reftype: &ReferenceType,
    ) -> OmapResult<()> {
        let source = self.resolve_oid(source)?;
        let target = self.resolve_oid(target)?;
        self.references.disconnect(source, target, reftype);
        debug!(%source, %target, %reftype, "disconnected");
        Ok(())
    }

    /// Objects referring to `loc`, as an owned copy.
    pub fn sourceids<'a>(
        &self,
        loc: impl Into<Location<'a>>,
        reftype: &ReferenceType,
    ) -> OmapResult<Adjacency> {
        let oid = self.resolve_oid(loc)?;
        Ok(self.references.sourceids(oid, reftype))
    }

    /// Objects `loc` refers to, as an owned copy.
    pub fn targetids<'a>(
        &self,
        loc: impl Into<Location<'a>>,
        reftype: &ReferenceType,
    ) -> OmapResult<Adjacency> {
        let oid = self.resolve_oid(loc)?;
        Ok(self.references.targetids(oid, reftype))
    }

    pub fn sources<'a, R: Resolver>(
        &self,
        resolver: &R,
        loc: impl Into<Location<'a>>,
        reftype: &ReferenceType,
    ) -> OmapResult<Vec<Option<R::Object>>> {
        let oids = self.sourceids(loc, reftype)?;
        Ok(oids.iter().map(|oid| self.resolve_with(resolver, oid)).collect())
    }

    pub fn targets<'a, R: Resolver>(
        &self,
        resolver: &R,
        loc: impl Into<Location<'a>>,
        reftype: &ReferenceType,
    ) -> OmapResult<Vec<Option<R::Object>>> {
        let oids = self.targetids(loc, reftype)?;
        Ok(oids.iter().map(|oid| self.resolve_with(resolver, oid)).collect())
    }

    /// Whether `loc` is a source or target under `reftype`, or under any
    /// reftype when `None`. A resource without an oid has no references.
    pub fn has_references<'a>(
        &self,
        loc: impl Into<Location<'a>>,
        reftype: Option<&ReferenceType>,
    ) -> OmapResult<bool> {
        let loc = loc.into();
        if let Location::Resource(resource) = loc {
            if resource.oid().is_none() {
                return Ok(false);
            }
        }
        let oid = self.resolve_oid(loc)?;
        Ok(self.references.has_references(oid, reftype))
    }

    pub fn get_reftypes(&self) -> impl Iterator<Item = &ReferenceType> + '_ {
        self.references.get_reftypes()
    }

    /// Order the sources of `loc`, or drop their ordering when `order` is
    /// `None`.
    pub fn order_sources<'a>(
        &mut self,
        loc: impl Into<Location<'a>>,
        reftype: &ReferenceType,
        order: Option<&[Location<'_>]>,
    ) -> OmapResult<Adjacency> {
        let anchor = self.resolve_oid(loc)?;
        let order = order.map(|items| self.resolve_oids(items)).transpose()?;
        self.order_oids(Orientation::Target, anchor, reftype, order.as_deref())
    }

    /// Order the targets of `loc`, or drop their ordering when `order` is
    /// `None`.
    pub fn order_targets<'a>(
        &mut self,
        loc: impl Into<Location<'a>>,
        reftype: &ReferenceType,
        order: Option<&[Location<'_>]>,
    ) -> OmapResult<Adjacency> {
        let anchor = self.resolve_oid(loc)?;
        let order = order.map(|items| self.resolve_oids(items)).transpose()?;
        self.order_oids(Orientation::Source, anchor, reftype, order.as_deref())
    }

    /// Order the far ends of `anchor`'s edges, seen from `orientation`.
    pub(crate) fn order_oids(
        &mut self,
        orientation: Orientation,
        anchor: ObjectId,
        reftype: &ReferenceType,
        order: Option<&[ObjectId]>,
    ) -> OmapResult<Adjacency> {
        let ordered = match orientation {
            Orientation::Source => self.references.order_targets(anchor, reftype, order)?,
            Orientation::Target => self.references.order_sources(anchor, reftype, order)?,
        };
        Ok(ordered)
    }

    /// Per-reftype target and source paths of `loc`. Reftypes under which
    /// the object has no references are left out.
    pub fn references<'a>(
        &self,
        loc: impl Into<Location<'a>>,
    ) -> OmapResult<Vec<ReferenceSummary>> {
        let oid = self.resolve_oid(loc)?;
        let paths_of = |oids: Adjacency| -> Vec<ObjectPath> {
            oids.iter()
                .filter_map(|oid| self.paths.path_for(oid).cloned())
                .collect()
        };
        Ok(self
            .references
            .get_reftypes()
            .filter_map(|reftype| {
                let targets = paths_of(self.references.targetids(oid, reftype));
                let sources = paths_of(self.references.sourceids(oid, reftype));
                (!targets.is_empty() || !sources.is_empty()).then(|| ReferenceSummary {
                    reftype: reftype.clone(),
                    targets,
                    sources,
                })
            })
            .collect())
    }

    // ---- Extents ----

    pub fn get_extent(&self, name: &str) -> Option<&BTreeSet<ObjectId>> {
        self.extents.get(name)
    }

    /// The oids of extent `name`, or `default` when it has none.
    pub fn get_extent_or(&self, name: &str, default: BTreeSet<ObjectId>) -> BTreeSet<ObjectId> {
        self.extents.get(name).cloned().unwrap_or(default)
    }
}
