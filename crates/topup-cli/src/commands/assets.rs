//! Assets command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use topup_core::AssetSpec;

use crate::cli::OutputFormat;
use crate::commands::load_catalog;
use crate::output::{format_percent, print_header, print_json, print_rows, print_warning};

/// Arguments for the assets command.
#[derive(Args, Debug)]
pub struct AssetsArgs {
    /// JSON file with the asset catalog
    #[arg(short, long, env = "TOPUP_ASSETS")]
    pub assets: Option<PathBuf>,
}

/// Catalog entry as shown to the user.
#[derive(Debug, Serialize, Tabled)]
pub struct AssetRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Asset")]
    pub name: String,
    #[tabled(rename = "Target")]
    pub target: String,
}

impl From<&AssetSpec> for AssetRow {
    fn from(asset: &AssetSpec) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            target: format_percent(asset.target),
        }
    }
}

/// Execute the assets command.
pub fn execute(args: AssetsArgs, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog(args.assets.as_deref())?;

    match format {
        OutputFormat::Json => print_json(catalog.assets())?,
        OutputFormat::Csv => {
            let rows: Vec<AssetRow> = catalog.assets().iter().map(AssetRow::from).collect();
            print_rows(&rows, format)?;
        }
        OutputFormat::Table => {
            let rows: Vec<AssetRow> = catalog.assets().iter().map(AssetRow::from).collect();
            print_header("Asset Catalog");
            print_rows(&rows, format)?;
        }
    }

    if !catalog.targets_sum_to_hundred() {
        print_warning(&format!(
            "Targets sum to {}%, not 100%",
            catalog.total_target()
        ));
    }

    Ok(())
}
