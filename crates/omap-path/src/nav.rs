//! Navigation trees built from the path index.

use omap_types::ObjectPath;
use serde::Serialize;

/// One node of a navigation tree.
///
/// Trees are materialized eagerly; they are bounded by the live tree size
/// and the requested depth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Full path of the node.
    pub path: ObjectPath,
    /// Last path segment.
    pub name: String,
    /// Children, sorted by path.
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn new(path: ObjectPath, children: Vec<NavNode>) -> Self {
        let name = path.name().to_string();
        Self {
            path,
            name,
            children,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(NavNode::size).sum::<usize>()
    }
}
