//! One reference type's bidirectional adjacency.

use std::collections::{BTreeMap, BTreeSet};

use omap_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;
use crate::error::RefResult;

/// Which side of an edge an anchor oid is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Source,
    Target,
}

/// `source -> targets` and `target -> sources` for one reference type.
///
/// Invariant: `t` is in `targets(s)` exactly when `s` is in `sources(t)`.
///
/// Empty unordered collections are dropped. An empty *ordered* collection is
/// kept, because it records that the anchor's references are ordered before
/// any have been made.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    src2target: BTreeMap<ObjectId, Adjacency>,
    target2src: BTreeMap<ObjectId, Adjacency>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, source: ObjectId, target: ObjectId) {
        self.src2target.entry(source).or_default().insert(target);
        self.target2src.entry(target).or_default().insert(source);
    }

    /// Remove the edge if present. Missing edges are ignored.
    pub fn disconnect(&mut self, source: ObjectId, target: ObjectId) {
        detach(&mut self.src2target, source, target);
        detach(&mut self.target2src, target, source);
    }

    pub fn targetids(&self, source: ObjectId) -> Option<&Adjacency> {
        self.src2target.get(&source)
    }

    pub fn sourceids(&self, target: ObjectId) -> Option<&Adjacency> {
        self.target2src.get(&target)
    }

    /// Returns `true` if `oid` has at least one outgoing edge.
    pub fn is_source(&self, oid: ObjectId) -> bool {
        self.src2target.get(&oid).is_some_and(|adj| !adj.is_empty())
    }

    /// Returns `true` if `oid` has at least one incoming edge.
    pub fn is_target(&self, oid: ObjectId) -> bool {
        self.target2src.get(&oid).is_some_and(|adj| !adj.is_empty())
    }

    /// Returns `true` if no anchor is recorded on either side.
    pub fn is_empty(&self) -> bool {
        self.src2target.is_empty() && self.target2src.is_empty()
    }

    /// Drop every edge touching any of `oids`, on both sides.
    ///
    /// Returns the oids that had an entry on at least one side.
    pub fn remove(&mut self, oids: &BTreeSet<ObjectId>) -> BTreeSet<ObjectId> {
        let mut touched = BTreeSet::new();
        for &oid in oids {
            if let Some(targets) = self.src2target.remove(&oid) {
                touched.insert(oid);
                for target in &targets {
                    detach(&mut self.target2src, target, oid);
                }
            }
            if let Some(sources) = self.target2src.remove(&oid) {
                touched.insert(oid);
                for source in &sources {
                    detach(&mut self.src2target, source, oid);
                }
            }
        }
        touched
    }

    /// Set or clear the ordering of `source`'s targets. See [`Self::order`].
    pub fn order_targets(
        &mut self,
        source: ObjectId,
        order: Option<&[ObjectId]>,
    ) -> RefResult<Adjacency> {
        self.order(Side::Source, source, order)
    }

    /// Set or clear the ordering of `target`'s sources. See [`Self::order`].
    pub fn order_sources(
        &mut self,
        target: ObjectId,
        order: Option<&[ObjectId]>,
    ) -> RefResult<Adjacency> {
        self.order(Side::Target, target, order)
    }

    /// With `None`, make `anchor`'s collection unordered (left untouched if
    /// it already is). With `Some(order)`, `order` must hold exactly the
    /// current members; the collection becomes an ordered list of `order`.
    ///
    /// Returns the resulting collection. Nothing changes on error.
    fn order(
        &mut self,
        side: Side,
        anchor: ObjectId,
        order: Option<&[ObjectId]>,
    ) -> RefResult<Adjacency> {
        let adjacency = match side {
            Side::Source => &mut self.src2target,
            Side::Target => &mut self.target2src,
        };
        let current = adjacency.get(&anchor).cloned().unwrap_or_default();

        match order {
            None => {
                if !current.is_ordered() {
                    return Ok(current);
                }
                let unordered = current.to_unordered();
                if unordered.is_empty() {
                    adjacency.remove(&anchor);
                } else {
                    adjacency.insert(anchor, unordered.clone());
                }
                Ok(unordered)
            }
            Some(order) => {
                let ordered = current.reordered(anchor, order)?;
                if ordered != current {
                    adjacency.insert(anchor, ordered.clone());
                }
                Ok(ordered)
            }
        }
    }
}

/// Remove `member` from `anchor`'s collection, dropping the collection if it
/// ends up empty and unordered.
fn detach(adjacency: &mut BTreeMap<ObjectId, Adjacency>, anchor: ObjectId, member: ObjectId) {
    if let Some(members) = adjacency.get_mut(&anchor) {
        members.remove(member);
        if members.is_empty() && !members.is_ordered() {
            adjacency.remove(&anchor);
        }
    }
}
