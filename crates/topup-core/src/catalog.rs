//! Asset catalogs.
//!
//! A catalog is the validated, ordered list of assets a portfolio is
//! rebalanced across. Holdings are aligned with the catalog by position.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{TopupError, TopupResult};
use crate::types::AssetSpec;

/// An ordered, validated set of assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AssetSpec>", into = "Vec<AssetSpec>")]
pub struct AssetCatalog {
    assets: Vec<AssetSpec>,
}

impl AssetCatalog {
    /// Builds a catalog, rejecting empty or duplicate ids and targets
    /// outside 0-100.
    pub fn new(assets: Vec<AssetSpec>) -> TopupResult<Self> {
        let mut seen = HashSet::with_capacity(assets.len());
        for asset in &assets {
            if asset.id.trim().is_empty() {
                return Err(TopupError::invalid_input(format!(
                    "asset '{}' has an empty id",
                    asset.name
                )));
            }
            if !seen.insert(asset.id.as_str()) {
                return Err(TopupError::duplicate_asset(&asset.id));
            }
            if asset.target < Decimal::ZERO || asset.target > Decimal::ONE_HUNDRED {
                return Err(TopupError::invalid_target(&asset.id, asset.target));
            }
        }
        Ok(Self { assets })
    }

    /// The assets in catalog order.
    #[must_use]
    pub fn assets(&self) -> &[AssetSpec] {
        &self.assets
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true if the catalog has no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Looks up an asset by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AssetSpec> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Sum of all target percentages.
    #[must_use]
    pub fn total_target(&self) -> Decimal {
        self.assets.iter().map(|a| a.target).sum()
    }

    /// Returns true if the targets add up to exactly 100%.
    #[must_use]
    pub fn targets_sum_to_hundred(&self) -> bool {
        self.total_target() == Decimal::ONE_HUNDRED
    }

    /// A zero holding for every asset, in catalog order.
    #[must_use]
    pub fn zero_holdings(&self) -> Vec<Decimal> {
        vec![Decimal::ZERO; self.assets.len()]
    }
}

impl Default for AssetCatalog {
    /// The built-in four-asset catalog.
    fn default() -> Self {
        Self {
            assets: vec![
                AssetSpec::new("1", "US Large Cap", dec!(48)),
                AssetSpec::new("2", "IL Gov Bonds", dec!(33)),
                AssetSpec::new("3", "Europe Equities", dec!(12)),
                AssetSpec::new("4", "Emerging Markets", dec!(7)),
            ],
        }
    }
}

impl TryFrom<Vec<AssetSpec>> for AssetCatalog {
    type Error = TopupError;

    fn try_from(assets: Vec<AssetSpec>) -> TopupResult<Self> {
        Self::new(assets)
    }
}

impl From<AssetCatalog> for Vec<AssetSpec> {
    fn from(catalog: AssetCatalog) -> Self {
        catalog.assets
    }
}

impl AsRef<[AssetSpec]> for AssetCatalog {
    fn as_ref(&self) -> &[AssetSpec] {
        &self.assets
    }
}
