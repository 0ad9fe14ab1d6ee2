//! Per-asset allocation outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AssetSpec;

/// Outcome of an allocation for a single asset.
///
/// Percentages are expressed against the post-deposit portfolio total and
/// rounded to one decimal place. `buy` is in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Asset identifier.
    pub id: String,
    /// Asset display name.
    pub name: String,
    /// Current holding as a percentage of the post-deposit total.
    pub current_pct: Decimal,
    /// Target weight, echoed from the asset definition.
    pub target_pct: Decimal,
    /// Amount to buy, in whole currency units.
    pub buy: i64,
    /// Holding after the buy, as a percentage of the post-deposit total.
    pub after_pct: Decimal,
    /// Signed distance of `after_pct` from the target.
    pub deviation: Decimal,
}

impl AllocationResult {
    /// The result reported for every asset when the portfolio and deposit
    /// are both empty.
    #[must_use]
    pub fn empty_portfolio(asset: &AssetSpec) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            current_pct: Decimal::ZERO,
            target_pct: asset.target,
            buy: 0,
            after_pct: Decimal::ZERO,
            deviation: -asset.target,
        }
    }

    /// Absolute gap between the current percentage and the target.
    #[must_use]
    pub fn current_gap(&self) -> Decimal {
        (self.current_pct - self.target_pct).abs()
    }
}
