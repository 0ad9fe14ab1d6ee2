//! Stored record types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use topup_core::AssetCatalog;

use crate::error::{StorageError, StorageResult};

/// The working state of a single user: current holdings and the pending
/// deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Value held per asset, aligned with the asset catalog.
    pub holdings: Vec<Decimal>,
    /// Cash waiting to be allocated.
    pub deposit: Decimal,
}

impl Default for UserData {
    /// Zero holdings for the built-in catalog and no deposit.
    fn default() -> Self {
        Self::empty(&AssetCatalog::default())
    }
}

impl UserData {
    /// Creates a record.
    #[must_use]
    pub fn new(holdings: Vec<Decimal>, deposit: Decimal) -> Self {
        Self { holdings, deposit }
    }

    /// Zero holdings for every asset in `catalog` and no deposit.
    #[must_use]
    pub fn empty(catalog: &AssetCatalog) -> Self {
        Self {
            holdings: catalog.zero_holdings(),
            deposit: Decimal::ZERO,
        }
    }

    /// Applies a partial update. Fields absent from the update are kept.
    pub fn merge(&mut self, update: DataUpdate) {
        if let Some(holdings) = update.holdings {
            self.holdings = holdings;
        }
        if let Some(deposit) = update.deposit {
            self.deposit = deposit;
        }
    }

    /// Total value of all holdings.
    #[must_use]
    pub fn total_holdings(&self) -> Decimal {
        self.holdings.iter().sum()
    }

    /// Checks the record lines up with `catalog`.
    pub fn check_catalog(&self, catalog: &AssetCatalog) -> StorageResult<()> {
        if self.holdings.len() != catalog.len() {
            return Err(StorageError::InvalidData(format!(
                "stored {} holdings for a catalog of {} assets",
                self.holdings.len(),
                catalog.len()
            )));
        }
        Ok(())
    }
}

/// A partial update to [`UserData`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUpdate {
    /// Replacement holdings, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<Decimal>>,
    /// Replacement deposit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<Decimal>,
}

impl DataUpdate {
    /// An update replacing only the holdings.
    #[must_use]
    pub fn holdings(holdings: Vec<Decimal>) -> Self {
        Self {
            holdings: Some(holdings),
            deposit: None,
        }
    }

    /// An update replacing only the deposit.
    #[must_use]
    pub fn deposit(deposit: Decimal) -> Self {
        Self {
            holdings: None,
            deposit: Some(deposit),
        }
    }

}
