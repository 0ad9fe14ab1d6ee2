//! Topup Storage Layer
//!
//! Persists the working state the allocator reads from: one record of current
//! holdings and the pending deposit. Two backends are provided:
//!
//! - **JsonFileStore**: A single JSON document on disk
//! - **InMemoryStore**: A process-local record for tests and development
//!
//! # Example
//!
//! ```rust,ignore
//! use topup_storage::{DataStore, DataUpdate, JsonFileStore};
//!
//! let store = JsonFileStore::open("./data/user-data.json")?;
//! store.update(DataUpdate::deposit(dec!(10000)))?;
//! let data = store.load()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod adapter;
mod error;
mod json_file;
mod memory;
mod types;

// Re-export core types
pub use adapter::DataStore;
pub use error::{StorageError, StorageResult};
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use types::{DataUpdate, UserData};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::DataStore;
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::json_file::JsonFileStore;
    pub use crate::memory::InMemoryStore;
    pub use crate::types::{DataUpdate, UserData};
}
