//! Error types for object map operations.

use std::collections::BTreeSet;

use omap_path::PathError;
use omap_refs::RefError;
use omap_types::{ObjectId, ObjectPath, ReferenceType};
use thiserror::Error;

use crate::map::ObjectMap;
use crate::resource::Resolver;

/// Errors returned by the [`ObjectMap`] facade.
///
/// Every failing call leaves the map exactly as it was.
#[derive(Debug, Error)]
pub enum OmapError {
    /// A location argument could not be used for this operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `add` was called with a path that is already live.
    #[error("path {0} already exists")]
    DuplicatePath(ObjectPath),

    /// `add` was called with an object whose oid is already live.
    #[error("objectid {0} already exists")]
    DuplicateOid(ObjectId),

    /// `add` was asked to both move and duplicate.
    #[error("cannot be both moving and duplicating")]
    InvalidCombination,

    /// An endpoint does not resolve to a live oid.
    #[error("{0} is not in objectmap")]
    UnknownEndpoint(String),

    /// A reference ordering did not match the existing members.
    #[error(transparent)]
    OrderMismatch(#[from] RefError),

    /// A removal would break a referential integrity constraint.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<PathError> for OmapError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::DuplicatePath(path) => OmapError::DuplicatePath(path),
            PathError::DuplicateOid(oid) => OmapError::DuplicateOid(oid),
        }
    }
}

/// Convenience alias for object map results.
pub type OmapResult<T> = Result<T, OmapError>;

/// A removal blocked by a reference type's integrity flag.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// The object is still the source of references it may not lose.
    #[error("{oid} is the source of {reftype} references to {oids:?}")]
    Source {
        /// The object that would have been removed.
        oid: ObjectId,
        /// The reference type carrying `source_integrity`.
        reftype: ReferenceType,
        /// Targets still referenced, self-references excluded.
        oids: BTreeSet<ObjectId>,
    },

    /// The object is still the target of references it may not lose.
    #[error("{oid} is the target of {reftype} references from {oids:?}")]
    Target {
        /// The object that would have been removed.
        oid: ObjectId,
        /// The reference type carrying `target_integrity`.
        reftype: ReferenceType,
        /// Sources still referencing it, self-references excluded.
        oids: BTreeSet<ObjectId>,
    },
}

impl IntegrityError {
    /// The object whose removal was refused.
    pub fn oid(&self) -> ObjectId {
        match self {
            IntegrityError::Source { oid, .. } | IntegrityError::Target { oid, .. } => *oid,
        }
    }

    pub fn reftype(&self) -> &ReferenceType {
        match self {
            IntegrityError::Source { reftype, .. } | IntegrityError::Target { reftype, .. } => {
                reftype
            }
        }
    }

    /// The oids on the other end of the blocking references.
    pub fn oids(&self) -> &BTreeSet<ObjectId> {
        match self {
            IntegrityError::Source { oids, .. } | IntegrityError::Target { oids, .. } => oids,
        }
    }

    /// Paths of the blocking objects that are still live in `map`.
    pub fn blocking_paths(&self, map: &ObjectMap) -> Vec<ObjectPath> {
        self.oids()
            .iter()
            .filter_map(|oid| map.path_for(*oid).cloned())
            .collect()
    }

    /// The blocking objects, materialized through `resolver`.
    pub fn blocking_objects<R: Resolver>(
        &self,
        map: &ObjectMap,
        resolver: &R,
    ) -> Vec<Option<R::Object>> {
        self.oids()
            .iter()
            .map(|oid| {
                map.path_for(*oid)
                    .and_then(|path| resolver.resolve(path))
            })
            .collect()
    }
}
