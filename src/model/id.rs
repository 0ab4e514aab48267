//! Identifier types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// District index in `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictId(pub usize);

impl DistrictId {
    /// Checks a raw (possibly negative) index against the district count.
    pub fn checked(raw: i64, districts: usize) -> Result<DistrictId, ConfigError> {
        match usize::try_from(raw) {
            Ok(idx) if idx < districts => Ok(DistrictId(idx)),
            _ => Err(ConfigError::DistrictOutOfRange {
                index: raw,
                districts,
            }),
        }
    }
}

impl fmt::Display for DistrictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// Response unit identifier (its index in the fleet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub usize);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// Emergency identifier, assigned in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmergencyId(pub u64);

impl fmt::Display for EmergencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
