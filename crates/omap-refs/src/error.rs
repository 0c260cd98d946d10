//! Error types for reference operations.

use omap_types::ObjectId;
use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefError {
    /// A requested ordering does not mention exactly the existing members.
    #[error(
        "order for anchor {anchor} must mention each existing oid exactly once \
         and no others: order {given:?} vs. oids {existing:?}"
    )]
    OrderMismatch {
        /// The oid whose adjacency was being ordered.
        anchor: ObjectId,
        /// The order that was passed.
        given: Vec<ObjectId>,
        /// The current members.
        existing: Vec<ObjectId>,
    },
}

/// Convenience type alias for reference operations.
pub type RefResult<T> = std::result::Result<T, RefError>;
