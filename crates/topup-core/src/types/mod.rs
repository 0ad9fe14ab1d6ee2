//! Domain types for deposit allocation.
//!
//! - [`AssetSpec`]: An asset with its display name and target weight
//! - [`AllocationResult`]: Per-asset outcome of one allocation call

mod asset;
mod result;

pub use asset::AssetSpec;
pub use result::AllocationResult;
