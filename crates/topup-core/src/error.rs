//! Error types for deposit allocation.
//!
//! The allocator itself has a single failure mode, invalid input, which is
//! always reported before any arithmetic is performed. Catalog construction
//! adds a couple of structural errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for allocation operations.
pub type TopupResult<T> = Result<T, TopupError>;

/// Errors that can occur while validating inputs or building a catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopupError {
    /// Inputs violate a precondition of the allocator.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Two assets in a catalog share the same identifier.
    #[error("Duplicate asset id '{id}'")]
    DuplicateAsset {
        /// The repeated identifier.
        id: String,
    },

    /// A target weight lies outside 0-100.
    #[error("Invalid target for asset '{id}': {target} (must be between 0 and 100)")]
    InvalidTarget {
        /// The asset identifier.
        id: String,
        /// The rejected target percentage.
        target: Decimal,
    },
}

impl TopupError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a duplicate asset error.
    #[must_use]
    pub fn duplicate_asset(id: impl Into<String>) -> Self {
        Self::DuplicateAsset { id: id.into() }
    }

    /// Create an invalid target error.
    #[must_use]
    pub fn invalid_target(id: impl Into<String>, target: Decimal) -> Self {
        Self::InvalidTarget {
            id: id.into(),
            target,
        }
    }

    /// Returns true if this is an [`TopupError::InvalidInput`].
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
