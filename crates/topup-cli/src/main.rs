//! Topup CLI - Split a cash deposit across a target-weight portfolio.
//!
//! # Usage
//!
//! ```bash
//! # Allocate a deposit against the built-in catalog
//! topup allocate --holdings 10,000 33,000 12,000 7,000 --deposit 10,000
//!
//! # Use a custom catalog and print JSON
//! topup --format json allocate --holdings 6000 4000 --deposit 500 --assets catalog.json
//!
//! # Show the catalog
//! topup assets
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = cli.format;

    match cli.command {
        Commands::Allocate(args) => commands::allocate::execute(args, format)?,
        Commands::Assets(args) => commands::assets::execute(args, format)?,
    }

    Ok(())
}
