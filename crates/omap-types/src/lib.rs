//! Foundation types for the object map.
//!
//! This crate provides the identity and location types shared by every other
//! object map crate. Every other `omap-*` crate depends on `omap-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Integer identifier assigned to a live node of the tree
//! - [`ObjectPath`] — Path tuple locating a node; the root is `[""]`
//! - [`ReferenceType`] — Token naming a category of directed relation
//! - [`IdFamily`] — The integer range identifiers are drawn from

pub mod error;
pub mod family;
pub mod object;
pub mod path;
pub mod reftype;

pub use error::TypeError;
pub use family::IdFamily;
pub use object::ObjectId;
pub use path::ObjectPath;
pub use reftype::ReferenceType;
