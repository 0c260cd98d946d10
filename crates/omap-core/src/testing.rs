//! Fixtures shared by the unit tests of this crate.

use omap_types::{ObjectId, ObjectPath};

use crate::map::{AddOptions, ObjectMap};
use crate::resource::Resource;

/// A minimal resource: an optional oid, a location and a type name.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub oid: Option<ObjectId>,
    pub path: Option<ObjectPath>,
    pub kind: String,
}

impl Node {
    pub fn folder(path: &str) -> Self {
        Self::of_type(path, "Folder")
    }

    pub fn of_type(path: &str, kind: &str) -> Self {
        Self {
            oid: None,
            path: Some(p(path)),
            kind: kind.to_string(),
        }
    }

    pub fn detached(kind: &str) -> Self {
        Self {
            oid: None,
            path: None,
            kind: kind.to_string(),
        }
    }
}

impl Resource for Node {
    fn oid(&self) -> Option<ObjectId> {
        self.oid
    }

    fn set_oid(&mut self, oid: ObjectId) {
        self.oid = Some(oid);
    }

    fn path(&self) -> Option<ObjectPath> {
        self.path.clone()
    }

    fn type_name(&self) -> &str {
        &self.kind
    }
}

pub(crate) fn p(s: &str) -> ObjectPath {
    ObjectPath::parse(s).unwrap()
}

pub(crate) fn oid(n: i64) -> ObjectId {
    ObjectId::new(n)
}

/// Add a `Folder` at each path, in order, returning the nodes with their
/// assigned oids.
pub(crate) fn populate(map: &mut ObjectMap, paths: &[&str]) -> Vec<Node> {
    paths
        .iter()
        .map(|path| {
            let mut node = Node::folder(path);
            map.add(&mut node, &p(path), AddOptions::default()).unwrap();
            node
        })
        .collect()
}
