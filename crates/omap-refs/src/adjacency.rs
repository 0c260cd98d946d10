//! Adjacency collections that are either sets or ordered lists.

use std::collections::{btree_set, BTreeSet};
use std::slice;

use omap_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{RefError, RefResult};

/// The oids at the other end of one anchor's references.
///
/// `Ordered` behaves like a set that remembers insertion order: inserting a
/// member that is already present is a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjacency {
    Unordered(BTreeSet<ObjectId>),
    Ordered(Vec<ObjectId>),
}

impl Default for Adjacency {
    fn default() -> Self {
        Adjacency::Unordered(BTreeSet::new())
    }
}

impl Adjacency {
    pub fn is_ordered(&self) -> bool {
        matches!(self, Adjacency::Ordered(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Adjacency::Unordered(set) => set.len(),
            Adjacency::Ordered(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, oid: ObjectId) -> bool {
        match self {
            Adjacency::Unordered(set) => set.contains(&oid),
            Adjacency::Ordered(list) => list.contains(&oid),
        }
    }

    /// Add `oid`. Returns `false` if it was already a member.
    pub fn insert(&mut self, oid: ObjectId) -> bool {
        match self {
            Adjacency::Unordered(set) => set.insert(oid),
            Adjacency::Ordered(list) => {
                if list.contains(&oid) {
                    return false;
                }
                list.push(oid);
                true
            }
        }
    }

    /// Drop `oid`. Returns `false` if it was not a member.
    pub fn remove(&mut self, oid: ObjectId) -> bool {
        match self {
            Adjacency::Unordered(set) => set.remove(&oid),
            Adjacency::Ordered(list) => match list.iter().position(|o| *o == oid) {
                Some(i) => {
                    list.remove(i);
                    true
                }
                None => false,
            },
        }
    }

    /// Positional access. Only ordered collections have positions.
    pub fn get(&self, index: usize) -> Option<ObjectId> {
        match self {
            Adjacency::Unordered(_) => None,
            Adjacency::Ordered(list) => list.get(index).copied(),
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        match self {
            Adjacency::Unordered(set) => Iter::Unordered(set.iter()),
            Adjacency::Ordered(list) => Iter::Ordered(list.iter()),
        }
    }

    /// Members in iteration order.
    pub fn to_vec(&self) -> Vec<ObjectId> {
        self.iter().collect()
    }

    /// Members as a set, regardless of representation.
    pub fn members(&self) -> BTreeSet<ObjectId> {
        self.iter().collect()
    }

    /// The same members without an ordering.
    pub fn to_unordered(&self) -> Adjacency {
        Adjacency::Unordered(self.members())
    }

    /// An ordered collection holding exactly `order`.
    ///
    /// `order` must list every current member once and nothing else.
    pub fn reordered(&self, anchor: ObjectId, order: &[ObjectId]) -> RefResult<Adjacency> {
        let wanted: BTreeSet<ObjectId> = order.iter().copied().collect();
        if wanted.len() != order.len() || wanted != self.members() {
            return Err(RefError::OrderMismatch {
                anchor,
                given: order.to_vec(),
                existing: self.to_vec(),
            });
        }
        Ok(Adjacency::Ordered(order.to_vec()))
    }
}

/// Iterator over an [`Adjacency`] in its iteration order.
pub enum Iter<'a> {
    Unordered(btree_set::Iter<'a, ObjectId>),
    Ordered(slice::Iter<'a, ObjectId>),
}

impl Iterator for Iter<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        match self {
            Iter::Unordered(it) => it.next().copied(),
            Iter::Ordered(it) => it.next().copied(),
        }
    }
}

impl<'a> IntoIterator for &'a Adjacency {
    type Item = ObjectId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
