//! Object map configuration, loaded from TOML.

use omap_types::IdFamily;
use serde::{Deserialize, Serialize};

use crate::error::{OmapError, OmapResult};

/// Configuration for an object map.
///
/// ```toml
/// family = "bits32"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectMapConfig {
    /// Integer range new oids are drawn from.
    pub family: IdFamily,
}

impl ObjectMapConfig {
    /// A configuration whose oids fit in 32 bits.
    pub fn compact() -> Self {
        Self {
            family: IdFamily::Bits32,
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> OmapResult<Self> {
        toml::from_str(s).map_err(|e| OmapError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = ObjectMapConfig::from_toml_str("").unwrap();
        assert_eq!(config, ObjectMapConfig::default());
        assert_eq!(config.family, IdFamily::Bits64);
    }

    #[test]
    fn family_is_read() {
        let config = ObjectMapConfig::from_toml_str("family = \"bits32\"").unwrap();
        assert_eq!(config, ObjectMapConfig::compact());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ObjectMapConfig::from_toml_str("famly = \"bits32\"").unwrap_err();
        assert!(matches!(err, OmapError::Config(_)));
    }

    #[test]
    fn unknown_family_is_rejected() {
        assert!(ObjectMapConfig::from_toml_str("family = \"bits16\"").is_err());
    }
}
