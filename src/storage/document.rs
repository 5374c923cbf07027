use chrono::Local;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::backend::KeyValueStore;
use crate::document::ProcessImprovement;
use crate::error::StorageError;
use crate::migration::{ensure_compatible_data, SchemaVersion};

/// Whole-document persistence used by the editor and the autosaver.
pub trait DocumentStore: Send + Sync {
    /// The stored document, migrated to the current shape, or `None` when
    /// nothing usable is stored.
    fn load(&self) -> Result<Option<ProcessImprovement>, StorageError>;

    /// Persist `doc` under the current schema's key.
    fn save(&self, doc: &ProcessImprovement) -> Result<(), StorageError>;
}

/// [`DocumentStore`] over a localStorage-like key-value backend.
///
/// Each schema generation persisted under its own key. Loading tries the
/// current key first and, when `legacy_key_fallback` is set, every older key
/// newest-first. Older keys are never written. A record under any key that
/// cannot be read or migrated is moved to a `<key>_backup_<timestamp>` key.
pub struct LocalDocumentStore<B: KeyValueStore> {
    backend: B,
    legacy_key_fallback: bool,
}

impl<B: KeyValueStore> LocalDocumentStore<B> {
    pub fn new(backend: B, legacy_key_fallback: bool) -> Self {
        Self {
            backend,
            legacy_key_fallback,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn candidate_keys(&self) -> Vec<SchemaVersion> {
        let mut versions = vec![SchemaVersion::CURRENT];
        if self.legacy_key_fallback {
            versions.extend(SchemaVersion::CURRENT.legacy());
        }
        versions
    }

    /// Move an unreadable record aside so it is not lost and not re-read.
    fn back_up(&self, key: &str, raw: &str) -> Result<String, StorageError> {
        let backup_key = format!("{}_backup_{}", key, Local::now().format("%Y%m%d_%H%M%S"));
        self.backend.set(&backup_key, raw)?;
        self.backend.remove(key)?;
        Ok(backup_key)
    }

    fn decode(&self, key: &str, raw: &str) -> Result<Option<ProcessImprovement>, StorageError> {
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                let backup_key = self.back_up(key, raw)?;
                error!(
                    "Stored record '{}' is not valid JSON ({}); moved to '{}'",
                    key, e, backup_key
                );
                return Ok(None);
            }
        };

        match ensure_compatible_data(parsed) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                let backup_key = self.back_up(key, raw)?;
                error!(
                    "Stored record '{}' could not be migrated ({}); moved to '{}'",
                    key, e, backup_key
                );
                Ok(None)
            }
        }
    }
}

impl<B: KeyValueStore> DocumentStore for LocalDocumentStore<B> {
    fn load(&self) -> Result<Option<ProcessImprovement>, StorageError> {
        for version in self.candidate_keys() {
            let key = version.storage_key();
            let Some(raw) = self.backend.get(key)? else {
                continue;
            };
            if let Some(doc) = self.decode(key, &raw)? {
                if version != SchemaVersion::CURRENT {
                    info!(
                        "Loaded document from legacy key '{}'; next save writes '{}'",
                        key,
                        SchemaVersion::CURRENT.storage_key()
                    );
                } else {
                    debug!("Loaded document from '{}'", key);
                }
                return Ok(Some(doc));
            }
            warn!("Skipping unusable record under '{}'", key);
        }
        Ok(None)
    }

    fn save(&self, doc: &ProcessImprovement) -> Result<(), StorageError> {
        let json = serde_json::to_string(doc)?;
        self.backend.set(SchemaVersion::CURRENT.storage_key(), &json)?;
        debug!("Saved document '{}' ({} bytes)", doc.title, json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    const V1_KEY: &str = "process_improvement_data_v1";
    const V2_KEY: &str = "process_improvement_data_v2";
    const V3_KEY: &str = "process_improvement_data_v3";

    fn store_with(entries: &[(&str, Value)], fallback: bool) -> LocalDocumentStore<MemoryStore> {
        let backend = MemoryStore::new();
        for (key, value) in entries {
            backend.set(key, &value.to_string()).unwrap();
        }
        LocalDocumentStore::new(backend, fallback)
    }

    #[test]
    fn test_empty_store_loads_none() {
        let store = store_with(&[], true);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_v1_record_migrated_on_load() {
        let store = store_with(
            &[(
                V1_KEY,
                json!({
                    "id": "p1",
                    "title": "Compras",
                    "steps": [{"id": "s1", "name": "Pedido", "currentScenario": "Papel",
                               "futureScenario": "Portal", "noImprovement": false, "userCards": []}],
                    "updatedAt": "2024-01-01T00:00:00.000Z"
                }),
            )],
            true,
        );

        let doc = store.load().unwrap().unwrap();
        assert_eq!(doc.id, "p1");
        assert_eq!(doc.flows.len(), 1);
        assert_eq!(doc.flows[0].steps[0].name, "Pedido");
        assert!(doc.steps.is_empty());
        // The legacy key is left alone.
        assert!(store.backend().get(V1_KEY).unwrap().is_some());
        assert!(store.backend().get(V3_KEY).unwrap().is_none());
    }

    #[test]
    fn test_current_key_wins_over_legacy() {
        let store = store_with(
            &[
                (V1_KEY, json!({"title": "Antigo", "steps": []})),
                (V3_KEY, json!({"title": "Atual", "flows": [{"id": "f1", "name": "F", "steps": []}]})),
            ],
            true,
        );
        assert_eq!(store.load().unwrap().unwrap().title, "Atual");
    }

    #[test]
    fn test_legacy_keys_read_newest_first() {
        let store = store_with(
            &[
                (V1_KEY, json!({"title": "v1", "steps": []})),
                (V2_KEY, json!({"title": "v2", "steps": []})),
            ],
            true,
        );
        assert_eq!(store.load().unwrap().unwrap().title, "v2");
    }

    #[test]
    fn test_fallback_disabled_ignores_legacy_keys() {
        let store = store_with(&[(V1_KEY, json!({"title": "v1", "steps": []}))], false);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_backed_up_and_treated_as_absent() {
        let backend = MemoryStore::new();
        backend.set(V3_KEY, "{not json").unwrap();
        let store = LocalDocumentStore::new(backend, true);

        assert!(store.load().unwrap().is_none());
        let keys = store.backend().keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("process_improvement_data_v3_backup_"));
        assert_eq!(store.backend().get(&keys[0]).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_corrupt_current_falls_back_to_legacy() {
        let backend = MemoryStore::new();
        backend.set(V3_KEY, "[[[").unwrap();
        backend.set(V2_KEY, &json!({"title": "v2", "steps": []}).to_string()).unwrap();
        let store = LocalDocumentStore::new(backend, true);

        assert_eq!(store.load().unwrap().unwrap().title, "v2");
    }

    #[test]
    fn test_corrupt_legacy_record_moved_to_backup() {
        let backend = MemoryStore::new();
        backend.set(V1_KEY, "{quebrado").unwrap();
        let store = LocalDocumentStore::new(backend, true);

        assert!(store.load().unwrap().is_none());
        assert!(store.backend().get(V1_KEY).unwrap().is_none());
        let keys = store.backend().keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("process_improvement_data_v1_backup_"));
        assert_eq!(store.backend().get(&keys[0]).unwrap().as_deref(), Some("{quebrado"));

        // A second load finds nothing to back up again.
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.backend().keys().len(), 1);
    }

    #[test]
    fn test_unrepresentable_record_backed_up() {
        let store = store_with(
            &[(V3_KEY, json!({"title": "P", "steps": [{"id": "s1", "inputs": "texto"}]}))],
            true,
        );
        assert!(store.load().unwrap().is_none());
        assert!(store.backend().get(V3_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_writes_current_key() {
        let store = store_with(&[], true);
        let doc = ProcessImprovement::empty();
        store.save(&doc).unwrap();

        assert!(store.backend().get(V3_KEY).unwrap().is_some());
        assert_eq!(store.load().unwrap(), Some(doc));
    }
}
