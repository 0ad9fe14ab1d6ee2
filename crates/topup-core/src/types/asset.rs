//! Asset definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An investable asset and its strategic target weight.
///
/// The target is a percentage in the range 0-100. Targets across a set of
/// assets conventionally sum to 100, but the allocator does not require it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    /// Unique, stable identifier.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Target weight as a percentage (0-100).
    pub target: Decimal,
}

impl AssetSpec {
    /// Creates a new asset definition.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, target: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target,
        }
    }

    /// Target weight as a fraction (0-1).
    #[must_use]
    pub fn target_fraction(&self) -> Decimal {
        self.target / Decimal::ONE_HUNDRED
    }
}

impl std::fmt::Display for AssetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}%)", self.name, self.target)
    }
}
