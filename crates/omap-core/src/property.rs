//! Attribute-style reference properties.
//!
//! A property binds a [`ReferenceType`] and an [`Orientation`] so that an
//! owning object can read and write its references like a field: a
//! [`SingleReference`] holds at most one related object, a
//! [`MultiReference`] holds a collection, optionally ordered.
//!
//! Properties hold no state of their own. Every call goes through the
//! [`ObjectMap`] that owns the references.

use omap_refs::Adjacency;
use omap_types::{ObjectId, ReferenceType};
use tracing::debug;

use crate::error::{OmapError, OmapResult};
use crate::location::Location;
use crate::map::ObjectMap;
use crate::resource::Resolver;

/// Which end of the edge the owning object sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The owner is the source; the property holds targets.
    Source,
    /// The owner is the target; the property holds sources.
    Target,
}

impl Orientation {
    fn related(self, map: &ObjectMap, owner: ObjectId, reftype: &ReferenceType) -> Adjacency {
        match self {
            Orientation::Source => map.reference_map().targetids(owner, reftype),
            Orientation::Target => map.reference_map().sourceids(owner, reftype),
        }
    }

    fn connect(
        self,
        map: &mut ObjectMap,
        owner: ObjectId,
        other: ObjectId,
        reftype: &ReferenceType,
    ) -> OmapResult<()> {
        match self {
            Orientation::Source => map.connect(owner, other, reftype),
            Orientation::Target => map.connect(other, owner, reftype),
        }
    }

    fn disconnect(
        self,
        map: &mut ObjectMap,
        owner: ObjectId,
        other: ObjectId,
        reftype: &ReferenceType,
    ) -> OmapResult<()> {
        match self {
            Orientation::Source => map.disconnect(owner, other, reftype),
            Orientation::Target => map.disconnect(other, owner, reftype),
        }
    }
}

// ---------------------------------------------------------------------------
// SingleReference
// ---------------------------------------------------------------------------

/// A reference property holding at most one object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleReference {
    reftype: ReferenceType,
    orientation: Orientation,
}

impl SingleReference {
    pub fn new(reftype: ReferenceType, orientation: Orientation) -> Self {
        Self {
            reftype,
            orientation,
        }
    }

    pub fn reftype(&self) -> &ReferenceType {
        &self.reftype
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The related oid, if any.
    pub fn get<'a>(
        &self,
        map: &ObjectMap,
        owner: impl Into<Location<'a>>,
    ) -> OmapResult<Option<ObjectId>> {
        let owner = map.resolve_oid(owner)?;
        Ok(self.orientation.related(map, owner, &self.reftype).iter().next())
    }

    /// The related object, materialized through `resolver`.
    pub fn get_object<'a, R: Resolver>(
        &self,
        map: &ObjectMap,
        resolver: &R,
        owner: impl Into<Location<'a>>,
    ) -> OmapResult<Option<R::Object>> {
        match self.get(map, owner)? {
            Some(oid) => map.object_for(resolver, oid),
            None => Ok(None),
        }
    }

    /// Point the property at `value`, dropping the previous value first.
    /// `None` clears it.
    pub fn set<'a>(
        &self,
        map: &mut ObjectMap,
        owner: impl Into<Location<'a>>,
        value: Option<Location<'_>>,
    ) -> OmapResult<()> {
        let owner = map.resolve_oid(owner)?;
        let value = value.map(|v| map.resolve_oid(v)).transpose()?;
        self.clear_oid(map, owner)?;
        if let Some(other) = value {
            self.orientation.connect(map, owner, other, &self.reftype)?;
        }
        Ok(())
    }

    pub fn clear<'a>(&self, map: &mut ObjectMap, owner: impl Into<Location<'a>>) -> OmapResult<()> {
        let owner = map.resolve_oid(owner)?;
        self.clear_oid(map, owner)
    }

    fn clear_oid(&self, map: &mut ObjectMap, owner: ObjectId) -> OmapResult<()> {
        let current = self.orientation.related(map, owner, &self.reftype);
        for other in current.iter() {
            self.orientation.disconnect(map, owner, other, &self.reftype)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MultiReference
// ---------------------------------------------------------------------------

/// A reference property holding a collection of objects.
///
/// An ordered property keeps related objects in the order they were
/// connected (or last arranged with `order_*`). An unordered one iterates
/// them by oid. With `ignore_missing`, endpoints that are not live are
/// skipped instead of failing the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiReference {
    reftype: ReferenceType,
    orientation: Orientation,
    ordered: bool,
    ignore_missing: bool,
}

impl MultiReference {
    pub fn new(reftype: ReferenceType, orientation: Orientation) -> Self {
        Self {
            reftype,
            orientation,
            ordered: false,
            ignore_missing: false,
        }
    }

    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    pub fn ignore_missing(mut self) -> Self {
        self.ignore_missing = true;
        self
    }

    pub fn reftype(&self) -> &ReferenceType {
        &self.reftype
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn oids<'a>(&self, map: &ObjectMap, owner: impl Into<Location<'a>>) -> OmapResult<Adjacency> {
        let owner = map.resolve_oid(owner)?;
        Ok(self.orientation.related(map, owner, &self.reftype))
    }

    pub fn objects<'a, R: Resolver>(
        &self,
        map: &ObjectMap,
        resolver: &R,
        owner: impl Into<Location<'a>>,
    ) -> OmapResult<Vec<Option<R::Object>>> {
        match self.orientation {
            Orientation::Source => map.targets(resolver, owner, &self.reftype),
            Orientation::Target => map.sources(resolver, owner, &self.reftype),
        }
    }

    pub fn len<'a>(&self, map: &ObjectMap, owner: impl Into<Location<'a>>) -> OmapResult<usize> {
        Ok(self.oids(map, owner)?.len())
    }

    pub fn is_empty<'a>(&self, map: &ObjectMap, owner: impl Into<Location<'a>>) -> OmapResult<bool> {
        Ok(self.oids(map, owner)?.is_empty())
    }

    /// Whether `item` is among the related objects. Items that are not
    /// live are never members.
    pub fn contains<'a, 'b>(
        &self,
        map: &ObjectMap,
        owner: impl Into<Location<'a>>,
        item: impl Into<Location<'b>>,
    ) -> OmapResult<bool> {
        let related = self.oids(map, owner)?;
        Ok(map
            .resolve_oid(item)
            .map(|oid| related.contains(oid))
            .unwrap_or(false))
    }

    /// The `index`-th related oid. Unordered collections have no positions
    /// and always answer `None`.
    pub fn get<'a>(
        &self,
        map: &ObjectMap,
        owner: impl Into<Location<'a>>,
        index: usize,
    ) -> OmapResult<Option<ObjectId>> {
        Ok(self.oids(map, owner)?.get(index))
    }

    pub fn connect<'a>(
        &self,
        map: &mut ObjectMap,
        owner: impl Into<Location<'a>>,
        items: &[Location<'_>],
    ) -> OmapResult<()> {
        let owner = map.resolve_oid(owner)?;
        let items = self.resolve_items(map, items)?;
        self.apply_ordering(map, owner)?;
        for other in items {
            self.orientation.connect(map, owner, other, &self.reftype)?;
        }
        Ok(())
    }

    pub fn disconnect<'a>(
        &self,
        map: &mut ObjectMap,
        owner: impl Into<Location<'a>>,
        items: &[Location<'_>],
    ) -> OmapResult<()> {
        let owner = map.resolve_oid(owner)?;
        let items = self.resolve_items(map, items)?;
        self.apply_ordering(map, owner)?;
        for other in items {
            self.orientation.disconnect(map, owner, other, &self.reftype)?;
        }
        Ok(())
    }

    /// Disconnect every related object.
    pub fn clear<'a>(&self, map: &mut ObjectMap, owner: impl Into<Location<'a>>) -> OmapResult<()> {
        let owner = map.resolve_oid(owner)?;
        let current = self.orientation.related(map, owner, &self.reftype);
        for other in current.iter() {
            self.orientation.disconnect(map, owner, other, &self.reftype)?;
        }
        Ok(())
    }

    /// Make `items` the complete, in-order content of the property.
    pub fn replace<'a>(
        &self,
        map: &mut ObjectMap,
        owner: impl Into<Location<'a>>,
        items: &[Location<'_>],
    ) -> OmapResult<()> {
        let owner = map.resolve_oid(owner)?;
        let items = self.resolve_items(map, items)?;
        self.clear(map, owner)?;
        self.apply_ordering(map, owner)?;
        for other in items {
            self.orientation.connect(map, owner, other, &self.reftype)?;
        }
        Ok(())
    }

    fn resolve_items(&self, map: &ObjectMap, items: &[Location<'_>]) -> OmapResult<Vec<ObjectId>> {
        let mut oids = Vec::with_capacity(items.len());
        for item in items {
            match map.resolve_oid(*item) {
                Ok(oid) => oids.push(oid),
                Err(OmapError::UnknownEndpoint(endpoint)) if self.ignore_missing => {
                    debug!(%endpoint, reftype = %self.reftype, "skipping missing endpoint");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(oids)
    }

    fn apply_ordering(&self, map: &mut ObjectMap, owner: ObjectId) -> OmapResult<()> {
        if self.ordered {
            let current = self.orientation.related(map, owner, &self.reftype).to_vec();
            map.order_oids(self.orientation, owner, &self.reftype, Some(current.as_slice()))?;
        } else {
            map.order_oids(self.orientation, owner, &self.reftype, None)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{oid, p, populate, Node};
    use omap_types::ObjectPath;

    fn setup() -> (ObjectMap, Vec<Node>) {
        let mut map = ObjectMap::new();
        let nodes = populate(&mut map, &["/", "/a", "/b", "/c", "/d"]);
        (map, nodes)
    }

    fn locs(nodes: &[Node]) -> Vec<Location<'_>> {
        nodes.iter().map(Location::from).collect()
    }

    fn id(node: &Node) -> ObjectId {
        node.oid.unwrap()
    }

    // ---- SingleReference ----

    #[test]
    fn single_set_get_replace_clear() {
        let (mut map, nodes) = setup();
        let owner = SingleReference::new(ReferenceType::new("owner"), Orientation::Source);

        assert_eq!(owner.get(&map, &nodes[1]).unwrap(), None);
        owner.set(&mut map, &nodes[1], Some((&nodes[2]).into())).unwrap();
        assert_eq!(owner.get(&map, &nodes[1]).unwrap(), Some(id(&nodes[2])));

        owner.set(&mut map, &nodes[1], Some((&nodes[3]).into())).unwrap();
        assert_eq!(owner.get(&map, &nodes[1]).unwrap(), Some(id(&nodes[3])));
        assert!(map.sourceids(&nodes[2], owner.reftype()).unwrap().is_empty());

        owner.set(&mut map, &nodes[1], None).unwrap();
        assert_eq!(owner.get(&map, &nodes[1]).unwrap(), None);

        owner.set(&mut map, &nodes[1], Some((&nodes[4]).into())).unwrap();
        owner.clear(&mut map, &nodes[1]).unwrap();
        assert!(!map.has_references(&nodes[1], None).unwrap());
    }

    #[test]
    fn single_target_orientation() {
        let (mut map, nodes) = setup();
        let parent = SingleReference::new(ReferenceType::new("child"), Orientation::Target);
        parent.set(&mut map, &nodes[2], Some((&nodes[1]).into())).unwrap();

        let targets = map.targetids(&nodes[1], parent.reftype()).unwrap();
        assert!(targets.contains(id(&nodes[2])));
        assert_eq!(parent.get(&map, &nodes[2]).unwrap(), Some(id(&nodes[1])));
    }

    #[test]
    fn single_set_to_unknown_changes_nothing() {
        let (mut map, nodes) = setup();
        let owner = SingleReference::new(ReferenceType::new("owner"), Orientation::Source);
        owner.set(&mut map, &nodes[1], Some((&nodes[2]).into())).unwrap();

        let err = owner.set(&mut map, &nodes[1], Some(oid(12345).into())).unwrap_err();
        assert!(matches!(err, OmapError::UnknownEndpoint(_)));
        assert_eq!(owner.get(&map, &nodes[1]).unwrap(), Some(id(&nodes[2])));
    }

    #[test]
    fn single_get_object() {
        let (mut map, nodes) = setup();
        let owner = SingleReference::new(ReferenceType::new("owner"), Orientation::Source);
        owner.set(&mut map, &nodes[1], Some((&nodes[2]).into())).unwrap();

        let resolve = |path: &ObjectPath| Some(path.name().to_string());
        assert_eq!(
            owner.get_object(&map, &resolve, &nodes[1]).unwrap(),
            Some("b".to_string())
        );
        assert_eq!(owner.get_object(&map, &resolve, &nodes[2]).unwrap(), None);
    }

    // ---- MultiReference ----

    #[test]
    fn ordered_multi_keeps_connection_order() {
        let (mut map, nodes) = setup();
        let items = MultiReference::new(ReferenceType::new("items"), Orientation::Source).ordered();

        let picks = [nodes[4].clone(), nodes[2].clone(), nodes[3].clone()];
        items.connect(&mut map, &nodes[1], &locs(&picks)).unwrap();

        let oids = items.oids(&map, &nodes[1]).unwrap();
        assert!(oids.is_ordered());
        assert_eq!(oids.to_vec(), vec![id(&nodes[4]), id(&nodes[2]), id(&nodes[3])]);
        assert_eq!(items.get(&map, &nodes[1], 1).unwrap(), Some(id(&nodes[2])));
        assert_eq!(items.get(&map, &nodes[1], 3).unwrap(), None);
        assert_eq!(items.len(&map, &nodes[1]).unwrap(), 3);
    }

    #[test]
    fn unordered_multi_drops_existing_order() {
        let (mut map, nodes) = setup();
        let rt = ReferenceType::new("items");
        let ordered = MultiReference::new(rt.clone(), Orientation::Source).ordered();
        ordered.connect(&mut map, &nodes[1], &locs(&nodes[3..4])).unwrap();

        let unordered = MultiReference::new(rt, Orientation::Source);
        unordered.connect(&mut map, &nodes[1], &locs(&nodes[2..3])).unwrap();
        let oids = unordered.oids(&map, &nodes[1]).unwrap();
        assert!(!oids.is_ordered());
        assert_eq!(oids.len(), 2);
        assert_eq!(unordered.get(&map, &nodes[1], 0).unwrap(), None);
    }

    #[test]
    fn multi_missing_items_fail_atomically() {
        let (mut map, nodes) = setup();
        let items = MultiReference::new(ReferenceType::new("items"), Orientation::Source);
        let ghost = p("/ghost");
        let request = [Location::from(&nodes[2]), Location::Path(&ghost)];

        let err = items.connect(&mut map, &nodes[1], &request).unwrap_err();
        assert!(matches!(err, OmapError::UnknownEndpoint(_)));
        assert!(items.is_empty(&map, &nodes[1]).unwrap());
    }

    #[test]
    fn multi_ignore_missing_skips_items() {
        let (mut map, nodes) = setup();
        let items = MultiReference::new(ReferenceType::new("items"), Orientation::Source)
            .ignore_missing();
        let request = [Location::from(&nodes[2]), Location::Oid(oid(424242))];

        items.connect(&mut map, &nodes[1], &request).unwrap();
        assert_eq!(items.oids(&map, &nodes[1]).unwrap().to_vec(), vec![id(&nodes[2])]);
        items.disconnect(&mut map, &nodes[1], &request).unwrap();
        assert!(items.is_empty(&map, &nodes[1]).unwrap());
    }

    #[test]
    fn multi_replace_and_clear() {
        let (mut map, nodes) = setup();
        let items = MultiReference::new(ReferenceType::new("items"), Orientation::Target).ordered();
        items.connect(&mut map, &nodes[1], &locs(&nodes[2..4])).unwrap();

        let replacement = [nodes[4].clone(), nodes[2].clone()];
        items.replace(&mut map, &nodes[1], &locs(&replacement)).unwrap();
        assert_eq!(
            items.oids(&map, &nodes[1]).unwrap().to_vec(),
            vec![id(&nodes[4]), id(&nodes[2])]
        );
        assert!(items.contains(&map, &nodes[1], &nodes[4]).unwrap());
        assert!(!items.contains(&map, &nodes[1], &nodes[3]).unwrap());
        assert!(!items.contains(&map, &nodes[1], oid(999)).unwrap());
        // owner is the target: the items point at it
        assert!(map.targetids(&nodes[4], items.reftype()).unwrap().contains(id(&nodes[1])));

        items.clear(&mut map, &nodes[1]).unwrap();
        assert!(items.is_empty(&map, &nodes[1]).unwrap());
    }

    #[test]
    fn multi_objects_follow_adjacency_order() {
        let (mut map, nodes) = setup();
        let items = MultiReference::new(ReferenceType::new("items"), Orientation::Source).ordered();
        let picks = [nodes[3].clone(), nodes[2].clone()];
        items.connect(&mut map, &nodes[1], &locs(&picks)).unwrap();

        let resolve = |path: &ObjectPath| Some(path.to_string());
        assert_eq!(
            items.objects(&map, &resolve, &nodes[1]).unwrap(),
            vec![Some("/c".to_string()), Some("/b".to_string())]
        );
    }
}
