//! Storage adapter trait definition.

use crate::error::StorageResult;
use crate::types::{DataUpdate, UserData};

/// Key-value store holding one user's holdings and pending deposit.
///
/// Implementations must be safe to share across request handlers. `update`
/// and `modify` are atomic with respect to other calls on the same store.
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use topup_storage::{DataStore, DataUpdate, InMemoryStore, UserData};
///
/// let store = InMemoryStore::new();
/// let data = store.update(DataUpdate::deposit(Decimal::from(500))).unwrap();
/// assert_eq!(data.deposit, Decimal::from(500));
///
/// let cleared = store
///     .modify(&mut |data| Some(UserData::new(data.holdings.clone(), Decimal::ZERO)))
///     .unwrap();
/// assert!(cleared.deposit.is_zero());
/// ```
pub trait DataStore: Send + Sync {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Loads the stored record, or the default when nothing has been saved.
    fn load(&self) -> StorageResult<UserData>;

    /// Replaces the stored record.
    fn save(&self, data: &UserData) -> StorageResult<()>;

    /// Merges a partial update into the stored record and returns the result.
    fn update(&self, update: DataUpdate) -> StorageResult<UserData>;

    /// Runs `f` on the stored record while holding the store's lock and
    /// writes back what it returns. `None` leaves the record untouched.
    ///
    /// Returns the record held once `f` has run.
    fn modify(
        &self,
        f: &mut dyn FnMut(&UserData) -> Option<UserData>,
    ) -> StorageResult<UserData>;
}
