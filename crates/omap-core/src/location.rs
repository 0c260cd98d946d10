//! [`Location`]: the ways an operation can name an object.

use std::fmt;

use omap_types::{ObjectId, ObjectPath};

use crate::resource::Resource;

/// Anything an object map operation accepts to name a node: the object
/// itself, its path, or its oid.
#[derive(Clone, Copy)]
pub enum Location<'a> {
    Resource(&'a dyn Resource),
    Path(&'a ObjectPath),
    Oid(ObjectId),
}

impl fmt::Debug for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Resource(r) => f
                .debug_struct("Resource")
                .field("type", &r.type_name())
                .field("oid", &r.oid())
                .field("path", &r.path())
                .finish(),
            Location::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Location::Oid(o) => f.debug_tuple("Oid").field(o).finish(),
        }
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Resource(r) => match (r.oid(), r.path()) {
                (Some(oid), _) => write!(f, "{} {}", r.type_name(), oid),
                (None, Some(path)) => write!(f, "{} at {}", r.type_name(), path),
                (None, None) => write!(f, "detached {}", r.type_name()),
            },
            Location::Path(p) => write!(f, "path {p}"),
            Location::Oid(o) => write!(f, "objectid {o}"),
        }
    }
}

impl From<ObjectId> for Location<'_> {
    fn from(oid: ObjectId) -> Self {
        Location::Oid(oid)
    }
}

impl<'a> From<&'a ObjectPath> for Location<'a> {
    fn from(path: &'a ObjectPath) -> Self {
        Location::Path(path)
    }
}

impl<'a, R: Resource> From<&'a R> for Location<'a> {
    fn from(resource: &'a R) -> Self {
        Location::Resource(resource)
    }
}
