//! Extent index for the object map.
//!
//! An extent is the set of oids registered under one type name, independent
//! of where the objects sit in the tree. The [`ExtentMap`] keeps the forward
//! (`name -> oids`) and reverse (`oid -> names`) maps as mutual inverses.

pub mod extent;

pub use extent::ExtentMap;
