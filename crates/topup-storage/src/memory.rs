//! In-memory storage adapter.
//!
//! Useful for testing and development. Data is not persisted across restarts.

use parking_lot::RwLock;

use crate::adapter::DataStore;
use crate::error::StorageResult;
use crate::types::{DataUpdate, UserData};

/// In-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<UserData>,
}

impl InMemoryStore {
    /// Creates a store holding the default record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `data`.
    #[must_use]
    pub fn with_data(data: UserData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

impl DataStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> StorageResult<UserData> {
        Ok(self.data.read().clone())
    }

    fn save(&self, data: &UserData) -> StorageResult<()> {
        *self.data.write() = data.clone();
        Ok(())
    }

    fn update(&self, update: DataUpdate) -> StorageResult<UserData> {
        let mut guard = self.data.write();
        guard.merge(update);
        Ok(guard.clone())
    }

    fn modify(
        &self,
        f: &mut dyn FnMut(&UserData) -> Option<UserData>,
    ) -> StorageResult<UserData> {
        let mut guard = self.data.write();
        if let Some(next) = f(&guard) {
            *guard = next;
        }
        Ok(guard.clone())
    }
}
