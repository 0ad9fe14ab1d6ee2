//! # Topup Core
//!
//! Deposit allocation for target-weight portfolios.
//!
//! Given the current value of each holding, a cash deposit, and a target
//! weight per asset, [`allocate`] works out how much of the deposit to put
//! into each asset so the portfolio moves toward its targets.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: No I/O, no caching, no state between calls
//! - **Exact money**: Amounts are `Decimal`; buys are whole currency units that
//!   always sum to the deposit
//! - **Fail fast**: Malformed input is rejected up front, never coerced
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use topup_core::prelude::*;
//!
//! let catalog = AssetCatalog::default();
//! let holdings = [dec!(10000), dec!(33000), dec!(12000), dec!(7000)];
//!
//! let plan = allocate_plan(&holdings, dec!(10000), catalog.assets()).unwrap();
//! assert_eq!(plan.total_buy(), 10000);
//!
//! let updated = plan.apply_to(&holdings).unwrap();
//! assert_eq!(updated.len(), 4);
//! ```
//!
//! ## Module Overview
//!
//! - [`allocator`] - The two-phase allocation algorithm
//! - [`rounding`] - Half-up and largest-remainder rounding
//! - [`catalog`] - Validated asset catalogs
//! - [`plan`] - Allocation plans and applying them to holdings
//! - [`types`] - Core types (AssetSpec, AllocationResult)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod allocator;
pub mod catalog;
pub mod error;
pub mod plan;
pub mod rounding;
pub mod types;

pub use allocator::{allocate, allocate_plan, DEFICIT_TOLERANCE};
pub use catalog::AssetCatalog;
pub use error::{TopupError, TopupResult};
pub use plan::AllocationPlan;
pub use types::{AllocationResult, AssetSpec};

/// Prelude module for convenient imports.
///
/// ```rust
/// use topup_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::allocator::{allocate, allocate_plan, DEFICIT_TOLERANCE};
    pub use crate::catalog::AssetCatalog;
    pub use crate::error::{TopupError, TopupResult};
    pub use crate::plan::AllocationPlan;
    pub use crate::rounding::largest_remainder_round;
    pub use crate::types::{AllocationResult, AssetSpec};

    pub use rust_decimal::Decimal;
}
