//! Error types for the path index.

use omap_types::{ObjectId, ObjectPath};

/// Errors that can occur while inserting into the path index.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    /// The path is already registered to another oid.
    #[error("path {0} already exists")]
    DuplicatePath(ObjectPath),

    /// The oid is already registered at another path.
    #[error("objectid {0} already exists")]
    DuplicateOid(ObjectId),
}

/// Convenience alias for path index results.
pub type PathResult<T> = Result<T, PathError>;
