//! The [`PathIndex`]: identity maps plus a depth-bucketed subtree index.
//!
//! For a node with oid `O` at path `P` of length `n`, every prefix `Q` of
//! `P` (length `m`, `P` included) holds `O` in its level `n - m` bucket.
//! Level 0 is "the node at this path", level `k` is "`k` levels below".
//!
//! Adding `/a/b/c` as oid 1 to an empty index produces:
//!
//! ```text
//! [""]                {3: {1}}
//! ["", a]             {2: {1}}
//! ["", a, b]          {1: {1}}
//! ["", a, b, c]       {0: {1}}
//! ```
//!
//! then adding `/a` as oid 2 and `/z` as oid 3:
//!
//! ```text
//! [""]                {1: {2, 3}, 3: {1}}
//! ["", a]             {0: {2}, 2: {1}}
//! ["", a, b]          {1: {1}}
//! ["", a, b, c]       {0: {1}}
//! ["", z]             {0: {3}}
//! ```
//!
//! Removing `/a` drops the `["", a]` run of keys and shifts oids 1 and 2 out
//! of the root's buckets, leaving `[""] {1: {3}}` and `["", z] {0: {3}}`.

use std::collections::{BTreeMap, BTreeSet};

use omap_types::{ObjectId, ObjectPath};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PathError, PathResult};
use crate::nav::NavNode;

/// Level buckets for one indexed path.
pub type Levels = BTreeMap<usize, BTreeSet<ObjectId>>;

/// Bijective `path <-> oid` maps over the live nodes, and the subtree index.
///
/// The index must stay in an ordered map: [`remove_subtree`] relies on every
/// descendant key of a path sorting into one contiguous range right after it.
///
/// [`remove_subtree`]: PathIndex::remove_subtree
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathIndex {
    oid_to_path: BTreeMap<ObjectId, ObjectPath>,
    path_to_oid: BTreeMap<ObjectPath, ObjectId>,
    index: BTreeMap<ObjectPath, Levels>,
}

impl PathIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.oid_to_path.len()
    }

    /// Returns `true` if no node is live.
    pub fn is_empty(&self) -> bool {
        self.oid_to_path.is_empty()
    }

    pub fn contains_oid(&self, oid: ObjectId) -> bool {
        self.oid_to_path.contains_key(&oid)
    }

    pub fn contains_path(&self, path: &ObjectPath) -> bool {
        self.path_to_oid.contains_key(path)
    }

    pub fn oid_for(&self, path: &ObjectPath) -> Option<ObjectId> {
        self.path_to_oid.get(path).copied()
    }

    pub fn path_for(&self, oid: ObjectId) -> Option<&ObjectPath> {
        self.oid_to_path.get(&oid)
    }

    /// Live `(oid, path)` pairs in oid order.
    pub fn entries(&self) -> impl Iterator<Item = (ObjectId, &ObjectPath)> + '_ {
        self.oid_to_path.iter().map(|(oid, path)| (*oid, path))
    }

    /// Indexed paths in sort order. Includes paths that are only ancestors
    /// of live nodes.
    pub fn indexed_paths(&self) -> impl Iterator<Item = &ObjectPath> + '_ {
        self.index.keys()
    }

    /// Level buckets recorded for `path`, if any.
    pub fn levels(&self, path: &ObjectPath) -> Option<&Levels> {
        self.index.get(path)
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Register `oid` at `path` in the identity maps and the subtree index.
    ///
    /// Fails without touching anything if either side is already live.
    pub fn add_path(&mut self, oid: ObjectId, path: &ObjectPath) -> PathResult<()> {
        if self.path_to_oid.contains_key(path) {
            return Err(PathError::DuplicatePath(path.clone()));
        }
        if self.oid_to_path.contains_key(&oid) {
            return Err(PathError::DuplicateOid(oid));
        }

        self.path_to_oid.insert(path.clone(), oid);
        self.oid_to_path.insert(oid, path.clone());

        let pathlen = path.len();
        for prefix in path.prefixes() {
            let level = pathlen - prefix.len();
            self.index
                .entry(prefix)
                .or_default()
                .entry(level)
                .or_default()
                .insert(oid);
        }

        debug!(%oid, %path, "indexed path");
        Ok(())
    }

    /// Remove `path` and everything below it.
    ///
    /// Returns every oid that was indexed under `path` (the node itself
    /// included). A path with no index entry is a no-op.
    pub fn remove_subtree(&mut self, path: &ObjectPath) -> BTreeSet<ObjectId> {
        let Some(origin) = self.index.get(path).cloned() else {
            return BTreeSet::new();
        };

        // Descendant keys sort contiguously from `path` onwards; the first
        // key that `path` is not a prefix of ends the run.
        let doomed: Vec<ObjectPath> = self
            .index
            .range(path.clone()..)
            .take_while(|(key, _)| path.is_prefix_of(key))
            .map(|(key, _)| key.clone())
            .collect();

        let mut removed = BTreeSet::new();
        for key in &doomed {
            let Some(levels) = self.index.remove(key) else {
                continue;
            };
            for oid in levels.into_values().flatten() {
                if let Some(live_path) = self.oid_to_path.remove(&oid) {
                    self.path_to_oid.remove(&live_path);
                }
                removed.insert(oid);
            }
        }

        // An oid at level `l` under `path` sits at level `l + offset` under
        // an ancestor `offset` segments shorter.
        for (distance, ancestor) in path.ancestors().enumerate() {
            let offset = distance + 1;
            let Some(levels) = self.index.get_mut(&ancestor) else {
                continue;
            };
            for (level, oids) in &origin {
                let shifted = level + offset;
                if let Some(bucket) = levels.get_mut(&shifted) {
                    for oid in oids {
                        bucket.remove(oid);
                    }
                    if bucket.is_empty() {
                        levels.remove(&shifted);
                    }
                }
            }
            if levels.is_empty() {
                self.index.remove(&ancestor);
            }
        }

        debug!(%path, removed = removed.len(), keys = doomed.len(), "removed subtree");
        removed
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Union of the level buckets under `path`, up to `depth` levels down
    /// (all levels when `depth` is `None`). Level 0 is skipped unless
    /// `include_origin` is set.
    pub fn lookup(
        &self,
        path: &ObjectPath,
        depth: Option<usize>,
        include_origin: bool,
    ) -> BTreeSet<ObjectId> {
        self.selected_buckets(path, depth, include_origin)
            .flatten()
            .copied()
            .collect()
    }

    /// Size of [`lookup`](Self::lookup)'s result, summed from bucket sizes.
    ///
    /// An oid lives in exactly one level bucket per indexed path, so the
    /// sum never double counts.
    pub fn count(&self, path: &ObjectPath, depth: Option<usize>, include_origin: bool) -> usize {
        self.selected_buckets(path, depth, include_origin)
            .map(BTreeSet::len)
            .sum()
    }

    fn selected_buckets<'a>(
        &'a self,
        path: &ObjectPath,
        depth: Option<usize>,
        include_origin: bool,
    ) -> impl Iterator<Item = &'a BTreeSet<ObjectId>> + 'a {
        let start = if include_origin { 0 } else { 1 };
        let end = depth.unwrap_or(usize::MAX);
        self.index
            .get(path)
            .filter(|_| start <= end)
            .into_iter()
            .flat_map(move |levels| levels.range(start..=end).map(|(_, oids)| oids))
    }

    /// Navigation tree of the live children of `path`, `depth` levels deep.
    ///
    /// `depth == 0` yields no children; `depth == 1` yields the direct
    /// children without their own children, and so on.
    pub fn children_tree(&self, path: &ObjectPath, depth: usize) -> Vec<NavNode> {
        if depth == 0 {
            return Vec::new();
        }
        let Some(children) = self.index.get(path).and_then(|levels| levels.get(&1)) else {
            return Vec::new();
        };
        let mut paths: Vec<&ObjectPath> = children
            .iter()
            .filter_map(|oid| self.oid_to_path.get(oid))
            .collect();
        paths.sort();
        paths
            .into_iter()
            .map(|child| NavNode::new(child.clone(), self.children_tree(child, depth - 1)))
            .collect()
    }
}
