//! Allocate command implementation.
//!
//! Splits a deposit across the catalog and prints the resulting plan.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use topup_core::{allocate_plan, AllocationPlan, AllocationResult};

use crate::cli::OutputFormat;
use crate::commands::{load_catalog, parse_holdings, sanitize_amount};
use crate::output::{
    format_amount, format_buy, format_deviation, format_percent, print_header, print_json,
    print_rows, print_warning,
};

/// Arguments for the allocate command.
#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Current value of each holding, in catalog order (e.g. 10,000 33,000)
    #[arg(long, num_args = 1.., value_name = "AMOUNT")]
    pub holdings: Vec<String>,

    /// Cash to invest
    #[arg(short, long, value_name = "AMOUNT")]
    pub deposit: String,

    /// JSON file with the asset catalog
    #[arg(short, long, env = "TOPUP_ASSETS")]
    pub assets: Option<PathBuf>,
}

/// One row of the plan as shown to the user.
#[derive(Debug, Serialize, Tabled)]
pub struct PlanRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Before")]
    pub before: String,
    #[tabled(rename = "Buy")]
    pub buy: String,
    #[tabled(rename = "After")]
    pub after: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Deviation")]
    pub deviation: String,
}

impl From<&AllocationResult> for PlanRow {
    fn from(r: &AllocationResult) -> Self {
        Self {
            asset: r.name.clone(),
            before: format_percent(r.current_pct),
            buy: format_buy(r.buy),
            after: format_percent(r.after_pct),
            target: format_percent(r.target_pct),
            deviation: format_deviation(r.deviation),
        }
    }
}

/// Execute the allocate command.
pub fn execute(args: AllocateArgs, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog(args.assets.as_deref())?;
    if !catalog.targets_sum_to_hundred() {
        print_warning(&format!(
            "Targets sum to {}%, allocations are normalised",
            catalog.total_target()
        ));
    }

    let holdings = parse_holdings(&args.holdings, &catalog)?;
    let deposit = sanitize_amount(&args.deposit)?;

    let plan = allocate_plan(&holdings, deposit, catalog.assets())?;

    match format {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Csv => print_rows(&rows(&plan), format)?,
        OutputFormat::Table => {
            print_header("Deposit Allocation");
            print_rows(&rows(&plan), format)?;
            println!(
                "{} {}",
                "Total buy:".bold(),
                format_amount(plan.total_buy()).green()
            );
        }
    }

    Ok(())
}

fn rows(plan: &AllocationPlan) -> Vec<PlanRow> {
    plan.results().iter().map(PlanRow::from).collect()
}
