//! The object map: identity, location and reference bookkeeping for a tree
//! of objects.
//!
//! An [`ObjectMap`] assigns every object that enters the tree a stable
//! integer [`ObjectId`], indexes it by path so that subtree queries are
//! bucket reads, records typed references between objects, and groups
//! objects into extents by type name. It is a side index: the tree itself
//! and the objects in it belong to the caller, who reaches them again
//! through a [`Resolver`].
//!
//! # Key Types
//!
//! - [`ObjectMap`] — The facade over path index, reference graph and extents
//! - [`Location`] — An object, a path, or an oid naming a node
//! - [`Resource`] / [`Resolver`] — Seams to the caller's objects
//! - [`IdAllocator`] — Cursor-based oid allocation
//! - [`SingleReference`] / [`MultiReference`] — Field-like reference properties
//! - [`ObjectMapConfig`] — Per-map settings, loadable from TOML
//!
//! # Example
//!
//! ```
//! use omap_core::{AddOptions, ObjectMap, ObjectPath, ObjectId, ReferenceType, Resource};
//!
//! struct Doc { oid: Option<ObjectId>, path: ObjectPath }
//!
//! impl Resource for Doc {
//!     fn oid(&self) -> Option<ObjectId> { self.oid }
//!     fn set_oid(&mut self, oid: ObjectId) { self.oid = Some(oid); }
//!     fn path(&self) -> Option<ObjectPath> { Some(self.path.clone()) }
//!     fn type_name(&self) -> &str { "Document" }
//! }
//!
//! let mut map = ObjectMap::new();
//! let a = ObjectPath::parse("/a").unwrap();
//! let b = ObjectPath::parse("/b").unwrap();
//! let mut doc_a = Doc { oid: None, path: a.clone() };
//! let mut doc_b = Doc { oid: None, path: b.clone() };
//! map.add(&mut doc_a, &a, AddOptions::default()).unwrap();
//! map.add(&mut doc_b, &b, AddOptions::default()).unwrap();
//!
//! let cites = ReferenceType::new("cites");
//! map.connect(&doc_a, &doc_b, &cites).unwrap();
//! assert!(map.targetids(&a, &cites).unwrap().contains(doc_b.oid.unwrap()));
//! ```

pub mod allocator;
pub mod config;
pub mod error;
pub mod integrity;
pub mod location;
pub mod map;
pub mod property;
pub mod resource;
mod snapshot;

#[cfg(test)]
mod testing;

pub use allocator::IdAllocator;
pub use config::ObjectMapConfig;
pub use error::{IntegrityError, OmapError, OmapResult};
pub use integrity::check_referential_integrity;
pub use location::Location;
pub use map::{AddOptions, ObjectMap, ReferenceSummary, DEFAULT_NAV_DEPTH};
pub use property::{MultiReference, Orientation, SingleReference};
pub use resource::{Resolver, Resource};

// Re-export key types
pub use omap_path::NavNode;
pub use omap_refs::Adjacency;
pub use omap_types::{IdFamily, ObjectId, ObjectPath, ReferenceType};
