//! Hierarchical path index for the object map.
//!
//! Maps every path that was ever a prefix of a live node's path to the oids
//! found at each relative depth below it, so that "everything under `P`
//! within depth `D`" is a handful of bucket reads instead of a tree walk.
//!
//! # Key Types
//!
//! - [`PathIndex`] — Identity maps plus the depth-bucketed index (BTreeMap-backed)
//! - [`NavNode`] — One node of a navigation tree built from the index
//! - [`PathError`] — Duplicate path / oid on insertion

pub mod error;
pub mod index;
pub mod nav;

pub use error::{PathError, PathResult};
pub use index::{Levels, PathIndex};
pub use nav::NavNode;
