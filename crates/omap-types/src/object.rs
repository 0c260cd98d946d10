use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier for a node registered in an object map.
///
/// Identifiers are unique among the live nodes of one map. The value `0` is
/// reserved as "irresolvable" and is never handed out by an allocator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(i64);

impl ObjectId {
    /// The reserved identifier. Never assigned to a node.
    pub const RESERVED: ObjectId = ObjectId(0);

    /// Wrap a raw integer.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` for the reserved identifier `0`.
    pub fn is_reserved(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ObjectId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<ObjectId> for i64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_is_zero() {
        assert!(ObjectId::RESERVED.is_reserved());
        assert!(ObjectId::new(0).is_reserved());
        assert!(!ObjectId::new(-1).is_reserved());
    }

    #[test]
    fn ordering_follows_integer_order() {
        assert!(ObjectId::new(-5) < ObjectId::new(3));
        assert!(ObjectId::new(3) < ObjectId::new(4));
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&ObjectId::new(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: ObjectId = serde_json::from_str("-7").unwrap();
        assert_eq!(parsed, ObjectId::new(-7));
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(ObjectId::new(-12).to_string(), "-12");
    }
}
