//! Local persistence for the single live document.
//!
//! Two layers:
//! - [`KeyValueStore`]: a localStorage-like string store (memory, JSON files,
//!   SQLite)
//! - [`DocumentStore`]: `load`/`save` of the whole document, implemented by
//!   [`LocalDocumentStore`] over any key-value backend

pub mod backend;
pub mod document;
pub mod file;
pub mod memory;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;

pub use backend::KeyValueStore;
pub use document::{DocumentStore, LocalDocumentStore};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// SQLite database file name inside the data directory.
pub const SQLITE_FILE_NAME: &str = "processflow.db";

/// Resolve the directory local storage lives in.
///
/// Uses the configured `data_dir` when set, otherwise
/// `<platform data dir>/processflow`.
pub fn resolve_data_dir(config: &StorageConfig) -> Result<PathBuf, StorageError> {
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|d| d.join("processflow"))
        .ok_or(StorageError::NoDataDir)
}

/// Build the document store described by `config`.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>, StorageError> {
    let fallback = config.legacy_key_fallback;
    let store: Arc<dyn DocumentStore> = match config.backend {
        StorageBackend::Memory => Arc::new(LocalDocumentStore::new(MemoryStore::new(), fallback)),
        StorageBackend::File => {
            let dir = resolve_data_dir(config)?;
            Arc::new(LocalDocumentStore::new(FileStore::new(dir), fallback))
        }
        StorageBackend::Sqlite => {
            let db_path = resolve_data_dir(config)?.join(SQLITE_FILE_NAME);
            Arc::new(LocalDocumentStore::new(SqliteStore::new(&db_path)?, fallback))
        }
    };
    info!("Opened {:?} document storage", config.backend);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ProcessImprovement;
    use tempfile::TempDir;

    fn config(backend: StorageBackend, dir: &TempDir) -> StorageConfig {
        StorageConfig {
            backend,
            data_dir: Some(dir.path().to_path_buf()),
            legacy_key_fallback: true,
        }
    }

    #[test]
    fn test_open_each_backend_round_trips() {
        for backend in [StorageBackend::Memory, StorageBackend::File, StorageBackend::Sqlite] {
            let dir = TempDir::new().unwrap();
            let store = open_store(&config(backend, &dir)).unwrap();
            assert!(store.load().unwrap().is_none());

            let doc = ProcessImprovement::empty();
            store.save(&doc).unwrap();
            assert_eq!(store.load().unwrap(), Some(doc), "backend {:?}", backend);
        }
    }

    #[test]
    fn test_sqlite_file_created_in_data_dir() {
        let dir = TempDir::new().unwrap();
        open_store(&config(StorageBackend::Sqlite, &dir)).unwrap();
        assert!(dir.path().join(SQLITE_FILE_NAME).exists());
    }

    #[test]
    fn test_configured_data_dir_wins() {
        let dir = TempDir::new().unwrap();
        let cfg = config(StorageBackend::File, &dir);
        assert_eq!(resolve_data_dir(&cfg).unwrap(), dir.path());
    }
}
