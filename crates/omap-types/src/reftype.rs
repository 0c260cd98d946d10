//! Reference type tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hashable token naming a category of directed relation between oids.
///
/// The two integrity flags are not interpreted by the reference graph itself;
/// they are read by the referential integrity check that runs before a
/// removal:
///
/// - `source_integrity`: an object that is still the *source* of an edge of
///   this type may not be removed.
/// - `target_integrity`: an object that is still the *target* of an edge of
///   this type may not be removed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceType {
    name: String,
    #[serde(default)]
    source_integrity: bool,
    #[serde(default)]
    target_integrity: bool,
}

impl ReferenceType {
    /// A reference type with no integrity constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_integrity: false,
            target_integrity: false,
        }
    }

    /// Block removal of objects that are still sources of this reftype.
    pub fn with_source_integrity(mut self) -> Self {
        self.source_integrity = true;
        self
    }

    /// Block removal of objects that are still targets of this reftype.
    pub fn with_target_integrity(mut self) -> Self {
        self.target_integrity = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_integrity(&self) -> bool {
        self.source_integrity
    }

    pub fn target_integrity(&self) -> bool {
        self.target_integrity
    }
}

impl fmt::Debug for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceType({}", self.name)?;
        if self.source_integrity {
            write!(f, ", source_integrity")?;
        }
        if self.target_integrity {
            write!(f, ", target_integrity")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_false() {
        let r = ReferenceType::new("owner");
        assert!(!r.source_integrity());
        assert!(!r.target_integrity());
    }

    #[test]
    fn builder_sets_flags() {
        let r = ReferenceType::new("owner")
            .with_source_integrity()
            .with_target_integrity();
        assert!(r.source_integrity());
        assert!(r.target_integrity());
        assert_eq!(r.name(), "owner");
    }

    #[test]
    fn flags_participate_in_identity() {
        let plain = ReferenceType::new("owner");
        let strict = ReferenceType::new("owner").with_source_integrity();
        assert_ne!(plain, strict);
    }

    #[test]
    fn missing_flags_deserialize_as_false() {
        let r: ReferenceType = serde_json::from_str(r#"{"name":"member"}"#).unwrap();
        assert_eq!(r, ReferenceType::new("member"));
    }
}
