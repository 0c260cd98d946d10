//! Integer families identifiers are drawn from.

use serde::{Deserialize, Serialize};

/// The signed integer range an object map allocates identifiers from.
///
/// `Bits64` uses the whole `i64` range. `Bits32` restricts identifiers to
/// the `i32` range, for maps whose consumers store oids in 32-bit indexes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFamily {
    #[default]
    Bits64,
    Bits32,
}

impl IdFamily {
    /// Smallest identifier in the family.
    pub const fn min(self) -> i64 {
        match self {
            IdFamily::Bits64 => i64::MIN,
            IdFamily::Bits32 => i32::MIN as i64,
        }
    }

    /// Largest identifier in the family.
    pub const fn max(self) -> i64 {
        match self {
            IdFamily::Bits64 => i64::MAX,
            IdFamily::Bits32 => i32::MAX as i64,
        }
    }

    /// Returns `true` if `raw` lies inside the family's range.
    pub fn contains(self, raw: i64) -> bool {
        raw >= self.min() && raw <= self.max()
    }
}
