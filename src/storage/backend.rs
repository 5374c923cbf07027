use crate::error::StorageError;

/// A string key-value store with localStorage semantics.
///
/// Implementations must be usable from the autosave task, hence
/// `Send + Sync`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
