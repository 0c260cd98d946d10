//! Binary snapshots of an [`ObjectMap`](crate::ObjectMap).

use crate::error::{OmapError, OmapResult};
use crate::map::ObjectMap;

impl ObjectMap {
    /// Encode the persistent state of the map. The allocator cursor is not
    /// included.
    pub fn to_snapshot(&self) -> OmapResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| OmapError::Snapshot(e.to_string()))
    }

    /// Decode a map written by [`to_snapshot`](Self::to_snapshot).
    pub fn from_snapshot(bytes: &[u8]) -> OmapResult<Self> {
        bincode::deserialize(bytes).map_err(|e| OmapError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectMapConfig;
    use crate::location::Location;
    use crate::testing::{p, populate};
    use omap_types::ReferenceType;

    #[test]
    fn snapshot_restores_every_structure() {
        let mut map = ObjectMap::with_config(ObjectMapConfig::compact());
        let nodes = populate(&mut map, &["/", "/a", "/a/b", "/c"]);
        let rt = ReferenceType::new("r").with_target_integrity();
        map.connect(&nodes[1], &nodes[3], &rt).unwrap();
        map.connect(&nodes[2], &nodes[3], &rt).unwrap();
        let order: [Location; 2] = [nodes[2].oid.unwrap().into(), nodes[1].oid.unwrap().into()];
        map.order_sources(&nodes[3], &rt, Some(&order[..])).unwrap();

        let restored = ObjectMap::from_snapshot(&map.to_snapshot().unwrap()).unwrap();
        assert_eq!(restored, map);
        assert_eq!(
            restored.sourceids(&p("/c"), &rt).unwrap().to_vec(),
            vec![nodes[2].oid.unwrap(), nodes[1].oid.unwrap()]
        );
        assert_eq!(restored.allocator.cursor(), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = ObjectMap::from_snapshot(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, OmapError::Snapshot(_)));
    }
}
