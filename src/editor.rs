//! Application root: owns the live document and wires storage, autosave,
//! import and export together.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::autosave::Autosaver;
use crate::config::EditorConfig;
use crate::document::ProcessImprovement;
use crate::error::{ExportError, ImportError, StorageError};
use crate::export::{self, Export, ExportFormat};
use crate::migration::{ensure_compatible_data, validate_process_json};
use crate::storage::{open_store, DocumentStore};

/// Shown after a successful import.
pub const IMPORT_SUCCESS_MESSAGE: &str = "Projeto carregado com sucesso!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

impl From<&ImportError> for Notification {
    fn from(err: &ImportError) -> Self {
        Notification::error(err.user_message())
    }
}

/// Parse, validate and migrate an imported project file.
///
/// A parse failure, a failed structural check, or a document the model
/// cannot represent is an error; nothing is partially applied.
pub fn parse_import(text: &str) -> Result<ProcessImprovement, ImportError> {
    let raw: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    if !validate_process_json(&raw) {
        return Err(ImportError::Validation);
    }
    Ok(ensure_compatible_data(raw)?)
}

pub struct Editor {
    doc: ProcessImprovement,
    store: Arc<dyn DocumentStore>,
    autosaver: Autosaver,
}

impl Editor {
    /// Start from whatever `store` holds, or from an empty document.
    pub fn open(store: Arc<dyn DocumentStore>, debounce: Duration) -> Self {
        let doc = match store.load() {
            Ok(Some(doc)) => {
                info!("Restored '{}' from local storage", doc.title);
                doc
            }
            Ok(None) => ProcessImprovement::empty(),
            Err(e) => {
                error!("Failed to load from local storage: {}", e);
                ProcessImprovement::empty()
            }
        };
        let autosaver = Autosaver::new(Arc::clone(&store), debounce);
        Self {
            doc,
            store,
            autosaver,
        }
    }

    /// Open the store described by `config`.
    pub fn from_config(config: &EditorConfig) -> Result<Self, StorageError> {
        let store = open_store(&config.storage)?;
        Ok(Self::open(store, config.autosave.debounce()))
    }

    pub fn document(&self) -> &ProcessImprovement {
        &self.doc
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn has_pending_save(&self) -> bool {
        self.autosaver.has_pending()
    }

    /// Apply an edit, then schedule an autosave.
    pub fn update<R>(&mut self, edit: impl FnOnce(&mut ProcessImprovement) -> R) -> R {
        let result = edit(&mut self.doc);
        self.autosaver.schedule(&self.doc);
        result
    }

    /// Write the current document now, replacing any pending autosave.
    ///
    /// Unlike the autosave path, a failed write is returned to the caller.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.autosaver.cancel();
        self.doc.touch();
        self.store.save(&self.doc)
    }

    /// Discard the current project and start an empty one.
    pub fn new_project(&mut self) {
        self.replace(ProcessImprovement::empty());
    }

    fn replace(&mut self, doc: ProcessImprovement) {
        self.doc = doc;
        self.autosaver.schedule(&self.doc);
    }

    /// Replace the live document with an imported one.
    ///
    /// On error the current document is left untouched.
    pub fn import_json(&mut self, text: &str) -> Result<Notification, ImportError> {
        match parse_import(text) {
            Ok(doc) => {
                info!("Imported '{}' ({} flows)", doc.title, doc.flows.len());
                self.replace(doc);
                Ok(Notification::success(IMPORT_SUCCESS_MESSAGE))
            }
            Err(e) => {
                warn!("Import rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn import_file(&mut self, path: &Path) -> Result<Notification, ImportError> {
        let text = std::fs::read_to_string(path).map_err(|e| ImportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.import_json(&text)
    }

    pub fn export(&self, format: ExportFormat) -> Result<Export, ExportError> {
        export::export(&self.doc, format)
    }

    pub fn export_to_dir(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf, ExportError> {
        let rendered = self.export(format)?;
        export::write_to_dir(&rendered, dir)
    }
}
