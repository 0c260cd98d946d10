//! Reference graph for the object map.
//!
//! Objects registered in an object map can be connected to each other with
//! typed, directed references. Each [`ReferenceType`] gets its own
//! [`ReferenceSet`] holding both adjacency directions, so "what does X point
//! at" and "what points at X" are both single map reads.
//!
//! # Architecture
//!
//! - **Adjacency** collections are either unordered (a sorted set) or ordered
//!   (an insertion-ordered list without duplicates). Switching between the
//!   two never changes membership.
//! - **Reference sets** keep `source -> targets` and `target -> sources` in
//!   lock step: `t` is a target of `s` exactly when `s` is a source of `t`.
//! - **The reference map** fans operations out to one reference set per
//!   reference type.
//!
//! # Modules
//!
//! - [`error`] — Error types for reference operations
//! - [`adjacency`] — [`Adjacency`], the set/list representation switch
//! - [`set`] — [`ReferenceSet`], one reftype's bidirectional adjacency
//! - [`map`] — [`ReferenceMap`], the per-reftype fan-out
//!
//! [`ReferenceType`]: omap_types::ReferenceType

pub mod adjacency;
pub mod error;
pub mod map;
pub mod set;

pub use adjacency::Adjacency;
pub use error::{RefError, RefResult};
pub use map::ReferenceMap;
pub use set::ReferenceSet;
