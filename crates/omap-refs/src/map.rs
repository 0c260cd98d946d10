//! The per-reftype fan-out over [`ReferenceSet`]s.

use std::collections::{BTreeMap, BTreeSet};

use omap_types::{ObjectId, ReferenceType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjacency::Adjacency;
use crate::error::RefResult;
use crate::set::ReferenceSet;

/// All reference sets of an object map, keyed by reference type.
///
/// A reference type becomes known the first time it is connected or given
/// an ordering, and stays known afterwards even if all of its edges go away.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMap {
    refmap: BTreeMap<ReferenceType, ReferenceSet>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, source: ObjectId, target: ObjectId, reftype: &ReferenceType) {
        self.refmap
            .entry(reftype.clone())
            .or_default()
            .connect(source, target);
    }

    pub fn disconnect(&mut self, source: ObjectId, target: ObjectId, reftype: &ReferenceType) {
        if let Some(refset) = self.refmap.get_mut(reftype) {
            refset.disconnect(source, target);
        }
    }

    /// Copy of `oid`'s targets under `reftype` (empty if none).
    pub fn targetids(&self, oid: ObjectId, reftype: &ReferenceType) -> Adjacency {
        self.refmap
            .get(reftype)
            .and_then(|refset| refset.targetids(oid))
            .cloned()
            .unwrap_or_default()
    }

    /// Copy of `oid`'s sources under `reftype` (empty if none).
    pub fn sourceids(&self, oid: ObjectId, reftype: &ReferenceType) -> Adjacency {
        self.refmap
            .get(reftype)
            .and_then(|refset| refset.sourceids(oid))
            .cloned()
            .unwrap_or_default()
    }

    pub fn order_targets(
        &mut self,
        source: ObjectId,
        reftype: &ReferenceType,
        order: Option<&[ObjectId]>,
    ) -> RefResult<Adjacency> {
        if let Some(refset) = self.refmap.get_mut(reftype) {
            return refset.order_targets(source, order);
        }
        if order.is_none() {
            return Ok(Adjacency::default());
        }
        let mut refset = ReferenceSet::new();
        let ordered = refset.order_targets(source, order)?;
        self.refmap.insert(reftype.clone(), refset);
        Ok(ordered)
    }

    pub fn order_sources(
        &mut self,
        target: ObjectId,
        reftype: &ReferenceType,
        order: Option<&[ObjectId]>,
    ) -> RefResult<Adjacency> {
        if let Some(refset) = self.refmap.get_mut(reftype) {
            return refset.order_sources(target, order);
        }
        if order.is_none() {
            return Ok(Adjacency::default());
        }
        let mut refset = ReferenceSet::new();
        let ordered = refset.order_sources(target, order)?;
        self.refmap.insert(reftype.clone(), refset);
        Ok(ordered)
    }

    /// Drop every edge touching `oids` in every reference set.
    ///
    /// Returns how many `(reftype, oid)` participations were removed.
    pub fn remove(&mut self, oids: &BTreeSet<ObjectId>) -> usize {
        let mut touched = 0;
        for (reftype, refset) in self.refmap.iter_mut() {
            let removed = refset.remove(oids);
            if !removed.is_empty() {
                debug!(%reftype, count = removed.len(), "dropped references");
            }
            touched += removed.len();
        }
        touched
    }

    /// Returns `true` if `oid` is a source or a target under `reftype`, or
    /// under any reftype when `reftype` is `None`.
    pub fn has_references(&self, oid: ObjectId, reftype: Option<&ReferenceType>) -> bool {
        let participates = |refset: &ReferenceSet| refset.is_source(oid) || refset.is_target(oid);
        match reftype {
            Some(reftype) => self.refmap.get(reftype).is_some_and(participates),
            None => self.refmap.values().any(participates),
        }
    }

    /// Every known reference type, in sort order.
    pub fn get_reftypes(&self) -> impl Iterator<Item = &ReferenceType> + '_ {
        self.refmap.keys()
    }

    pub fn get(&self, reftype: &ReferenceType) -> Option<&ReferenceSet> {
        self.refmap.get(reftype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: i64) -> ObjectId {
        ObjectId::new(n)
    }

    fn ids(v: &[i64]) -> Vec<ObjectId> {
        v.iter().copied().map(ObjectId::new).collect()
    }

    fn owner() -> ReferenceType {
        ReferenceType::new("owner")
    }

    fn member() -> ReferenceType {
        ReferenceType::new("member")
    }

    #[test]
    fn connect_is_scoped_by_reftype() {
        let mut map = ReferenceMap::new();
        map.connect(oid(1), oid(2), &owner());
        assert_eq!(map.targetids(oid(1), &owner()).to_vec(), ids(&[2]));
        assert!(map.targetids(oid(1), &member()).is_empty());
        assert_eq!(map.sourceids(oid(2), &owner()).to_vec(), ids(&[1]));
    }

    #[test]
    fn disconnect_unknown_reftype_is_silent() {
        let mut map = ReferenceMap::new();
        map.disconnect(oid(1), oid(2), &owner());
        assert_eq!(map.get_reftypes().count(), 0);
    }

    #[test]
    fn returned_adjacency_is_a_copy() {
        let mut map = ReferenceMap::new();
        map.connect(oid(1), oid(2), &owner());
        map.connect(oid(1), oid(3), &owner());
        let targets = map.targetids(oid(1), &owner());
        for target in &targets {
            map.disconnect(oid(1), target, &owner());
        }
        assert!(map.targetids(oid(1), &owner()).is_empty());
    }

    #[test]
    fn remove_fans_out_over_reftypes() {
        let mut map = ReferenceMap::new();
        map.connect(oid(1), oid(2), &owner());
        map.connect(oid(3), oid(1), &member());
        map.connect(oid(3), oid(4), &member());

        let touched = map.remove(&[oid(1)].into_iter().collect());
        assert_eq!(touched, 2);
        assert!(!map.has_references(oid(1), None));
        assert!(!map.has_references(oid(2), None));
        assert!(map.has_references(oid(3), Some(&member())));
        // Reftypes stay known after their edges are gone.
        assert_eq!(map.get_reftypes().count(), 2);
    }

    #[test]
    fn has_references_by_reftype() {
        let mut map = ReferenceMap::new();
        map.connect(oid(1), oid(2), &owner());
        assert!(map.has_references(oid(1), Some(&owner())));
        assert!(map.has_references(oid(2), Some(&owner())));
        assert!(!map.has_references(oid(1), Some(&member())));
        assert!(map.has_references(oid(2), None));
        assert!(!map.has_references(oid(3), None));
    }

    #[test]
    fn ordering_without_refset() {
        let mut map = ReferenceMap::new();
        let adj = map.order_targets(oid(1), &owner(), None).unwrap();
        assert!(adj.is_empty());
        assert_eq!(map.get_reftypes().count(), 0);

        let adj = map.order_targets(oid(1), &owner(), Some(&[][..])).unwrap();
        assert!(adj.is_ordered());
        assert_eq!(map.get_reftypes().count(), 1);

        assert!(map.order_sources(oid(1), &member(), Some(&ids(&[4])[..])).is_err());
        assert!(map.get(&member()).is_none());
    }

    #[test]
    fn ordering_with_refset() {
        let mut map = ReferenceMap::new();
        map.connect(oid(2), oid(1), &owner());
        map.connect(oid(3), oid(1), &owner());
        map.order_sources(oid(1), &owner(), Some(&ids(&[3, 2])[..])).unwrap();
        assert_eq!(map.sourceids(oid(1), &owner()).to_vec(), ids(&[3, 2]));
        map.order_sources(oid(1), &owner(), None).unwrap();
        assert_eq!(map.sourceids(oid(1), &owner()).to_vec(), ids(&[2, 3]));
    }
}
