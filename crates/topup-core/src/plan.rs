//! Allocation plans.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TopupError, TopupResult};
use crate::types::AllocationResult;

/// The full outcome of one allocation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPlan {
    results: Vec<AllocationResult>,
    deposit: Decimal,
    total_after: Decimal,
}

impl AllocationPlan {
    /// Wraps allocation results together with the deposit and the
    /// post-deposit portfolio total they were computed against.
    #[must_use]
    pub fn new(results: Vec<AllocationResult>, deposit: Decimal, total_after: Decimal) -> Self {
        Self {
            results,
            deposit,
            total_after,
        }
    }

    /// Per-asset results in catalog order.
    #[must_use]
    pub fn results(&self) -> &[AllocationResult] {
        &self.results
    }

    /// The deposit that was allocated.
    #[must_use]
    pub fn deposit(&self) -> Decimal {
        self.deposit
    }

    /// Portfolio value once the deposit is invested.
    #[must_use]
    pub fn total_after(&self) -> Decimal {
        self.total_after
    }

    /// Sum of all buys. Equal to the deposit for any plan produced by the
    /// allocator.
    #[must_use]
    pub fn total_buy(&self) -> i64 {
        self.results.iter().map(|r| r.buy).sum()
    }

    /// Buy amounts in catalog order.
    #[must_use]
    pub fn buys(&self) -> Vec<i64> {
        self.results.iter().map(|r| r.buy).collect()
    }

    /// Looks up the result for one asset.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AllocationResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Results whose current percentage is more than `threshold` points away
    /// from target.
    pub fn off_target(&self, threshold: Decimal) -> impl Iterator<Item = &AllocationResult> {
        self.results
            .iter()
            .filter(move |r| r.current_gap() > threshold)
    }

    /// Holdings after every buy in the plan is executed.
    ///
    /// # Errors
    ///
    /// Returns [`TopupError::InvalidInput`] if `holdings` is not aligned with
    /// the plan.
    pub fn apply_to(&self, holdings: &[Decimal]) -> TopupResult<Vec<Decimal>> {
        if holdings.len() != self.results.len() {
            return Err(TopupError::invalid_input(format!(
                "plan covers {} assets, got {} holdings",
                self.results.len(),
                holdings.len()
            )));
        }
        holdings
            .iter()
            .zip(&self.results)
            .map(|(value, r)| {
                value.checked_add(Decimal::from(r.buy)).ok_or_else(|| {
                    TopupError::invalid_input(format!("holding for asset '{}' out of range", r.id))
                })
            })
            .collect()
    }
}
