//! Filter criteria

use serde::{Deserialize, Serialize};

/// Attribute values a record must carry to be kept
///
/// All comparisons are case-sensitive. `species` and `status` must match
/// exactly, `origin_prefix` must be a prefix of `origin.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Required `species`
    pub species: String,
    /// Required `status`
    pub status: String,
    /// Required prefix of `origin.name`
    pub origin_prefix: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            species: "Human".to_string(),
            status: "Alive".to_string(),
            origin_prefix: "Earth".to_string(),
        }
    }
}

impl FilterCriteria {
    /// Create criteria from explicit values
    pub fn new(
        species: impl Into<String>,
        status: impl Into<String>,
        origin_prefix: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            status: status.into(),
            origin_prefix: origin_prefix.into(),
        }
    }
}
