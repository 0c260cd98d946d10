//! The [`ExtentMap`]: type names to the oids of their instances.

use std::collections::{BTreeMap, BTreeSet};

use omap_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Type name to oid membership, plus its reverse.
///
/// Normally an oid belongs to exactly one extent. More than one is allowed
/// so that bookkeeping can re-register an oid before dropping the old entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentMap {
    extent_to_oids: BTreeMap<String, BTreeSet<ObjectId>>,
    oid_to_extents: BTreeMap<ObjectId, BTreeSet<String>>,
}

impl ExtentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `oid` under `name`.
    pub fn add(&mut self, oid: ObjectId, name: &str) {
        self.extent_to_oids
            .entry(name.to_string())
            .or_default()
            .insert(oid);
        self.oid_to_extents
            .entry(oid)
            .or_default()
            .insert(name.to_string());
    }

    /// Drop every extent membership of `oids`, deleting extents that become
    /// empty.
    pub fn remove(&mut self, oids: &BTreeSet<ObjectId>) {
        let mut dropped = 0usize;
        for oid in oids {
            let Some(names) = self.oid_to_extents.remove(oid) else {
                continue;
            };
            dropped += 1;
            for name in names {
                if let Some(members) = self.extent_to_oids.get_mut(&name) {
                    members.remove(oid);
                    if members.is_empty() {
                        self.extent_to_oids.remove(&name);
                    }
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, "dropped extent memberships");
        }
    }

    /// Members of the extent `name`, if it has any.
    pub fn get(&self, name: &str) -> Option<&BTreeSet<ObjectId>> {
        self.extent_to_oids.get(name)
    }

    /// Extent names `oid` is registered under.
    pub fn extents_of(&self, oid: ObjectId) -> Option<&BTreeSet<String>> {
        self.oid_to_extents.get(&oid)
    }

    /// Known extent names in sort order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.extent_to_oids.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: i64) -> ObjectId {
        ObjectId::new(n)
    }

    fn set(v: &[i64]) -> BTreeSet<ObjectId> {
        v.iter().copied().map(ObjectId::new).collect()
    }

    #[test]
    fn add_registers_both_directions() {
        let mut extents = ExtentMap::new();
        extents.add(oid(1), "Document");
        extents.add(oid(2), "Document");
        extents.add(oid(3), "Folder");

        assert_eq!(extents.get("Document"), Some(&set(&[1, 2])));
        assert_eq!(extents.get("Folder"), Some(&set(&[3])));
        assert!(extents.extents_of(oid(1)).unwrap().contains("Document"));
        assert_eq!(extents.names().collect::<Vec<_>>(), vec!["Document", "Folder"]);
    }

    #[test]
    fn remove_drops_memberships_and_empty_extents() {
        let mut extents = ExtentMap::new();
        extents.add(oid(1), "Document");
        extents.add(oid(2), "Document");
        extents.add(oid(3), "Folder");

        extents.remove(&set(&[1, 3, 99]));
        assert_eq!(extents.get("Document"), Some(&set(&[2])));
        assert!(extents.get("Folder").is_none());
        assert!(extents.extents_of(oid(1)).is_none());
        assert!(extents.extents_of(oid(3)).is_none());
    }

    #[test]
    fn oid_in_two_extents_is_removed_from_both() {
        let mut extents = ExtentMap::new();
        extents.add(oid(1), "Old");
        extents.add(oid(1), "New");
        extents.remove(&set(&[1]));
        assert_eq!(extents, ExtentMap::new());
    }
}
