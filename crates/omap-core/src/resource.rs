//! Seams between the object map and the objects it indexes.
//!
//! The map never owns the objects it tracks. It asks a [`Resource`] for its
//! identity and location when one is passed in, and it asks a [`Resolver`]
//! to turn a path back into an object when a caller wants objects rather
//! than oids.

use omap_types::{ObjectId, ObjectPath};

/// An object that can be registered in an object map.
pub trait Resource {
    /// The oid attribute, if one has been assigned.
    fn oid(&self) -> Option<ObjectId>;

    /// Record the oid the map assigned.
    fn set_oid(&mut self, oid: ObjectId);

    /// The object's location derived from its lineage, or `None` when it is
    /// detached from any tree.
    fn path(&self) -> Option<ObjectPath>;

    /// Type name used as the object's extent.
    fn type_name(&self) -> &str;
}

/// Traverses from the tree root to the object at a path.
pub trait Resolver {
    type Object;

    fn resolve(&self, path: &ObjectPath) -> Option<Self::Object>;
}

impl<F, T> Resolver for F
where
    F: Fn(&ObjectPath) -> Option<T>,
{
    type Object = T;

    fn resolve(&self, path: &ObjectPath) -> Option<T> {
        self(path)
    }
}
