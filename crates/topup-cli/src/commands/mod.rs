//! CLI command implementations.

pub mod allocate;
pub mod assets;

pub use allocate::AllocateArgs;
pub use assets::AssetsArgs;

use std::path::Path;

use rust_decimal::Decimal;

use topup_core::AssetCatalog;

use crate::error::{CliError, CliResult};

/// Reads a money amount typed by a person.
///
/// Everything except ASCII digits is dropped, so `"12,000"` and `"$12 000"`
/// both read as 12000. An input with no digits reads as zero.
pub fn sanitize_amount(input: &str) -> CliResult<Decimal> {
    input
        .chars()
        .filter_map(|c| c.to_digit(10))
        .try_fold(Decimal::ZERO, |acc, digit| {
            acc.checked_mul(Decimal::TEN)
                .and_then(|v| v.checked_add(Decimal::from(digit)))
        })
        .ok_or_else(|| CliError::AmountTooLarge(input.to_string()))
}

/// Sanitises every holding and pads with zeros up to the catalog size.
pub fn parse_holdings(inputs: &[String], catalog: &AssetCatalog) -> CliResult<Vec<Decimal>> {
    let mut holdings = inputs
        .iter()
        .map(|s| sanitize_amount(s))
        .collect::<CliResult<Vec<_>>>()?;
    if holdings.len() < catalog.len() {
        holdings.resize(catalog.len(), Decimal::ZERO);
    }
    Ok(holdings)
}

/// Loads a catalog from a JSON file, or the built-in catalog.
pub fn load_catalog(path: Option<&Path>) -> CliResult<AssetCatalog> {
    let Some(path) = path else {
        return Ok(AssetCatalog::default());
    };
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::Catalog {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
