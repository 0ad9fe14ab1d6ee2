//! CLI error types.

use thiserror::Error;

use topup_core::TopupError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog file could not be parsed or failed validation.
    #[error("Invalid asset catalog {path}: {reason}")]
    Catalog {
        /// Path given on the command line
        path: String,
        /// Parser or validation message
        reason: String,
    },

    /// A typed amount has more digits than a decimal can hold.
    #[error("Amount too large: {0}")]
    AmountTooLarge(String),

    /// Allocation rejected its input.
    #[error(transparent)]
    Allocation(#[from] TopupError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
