use std::path::PathBuf;

use thiserror::Error;

/// User-facing message when a file cannot be read or parsed.
pub const READ_FAILURE_MESSAGE: &str = "Erro na leitura do arquivo.";
/// User-facing message when a file parses but is not a process document.
pub const INVALID_FILE_MESSAGE: &str = "Arquivo JSON inválido ou corrompido.";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No data directory available for local storage")]
    NoDataDir,

    #[error("Storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document does not match the current schema: {0}")]
    Shape(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read import file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Import is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Import is not a process document")]
    Validation,

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ImportError {
    /// The transient notification text shown for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ImportError::Read { .. } | ImportError::Parse(_) => READ_FAILURE_MESSAGE,
            ImportError::Validation | ImportError::Document(_) => INVALID_FILE_MESSAGE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write export to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export file name is not a plain file name: {0:?}")]
    InvalidFileName(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl From<ImportError> for String {
    fn from(err: ImportError) -> Self {
        err.to_string()
    }
}

impl From<ExportError> for String {
    fn from(err: ExportError) -> Self {
        err.to_string()
    }
}

impl From<StorageError> for String {
    fn from(err: StorageError) -> Self {
        err.to_string()
    }
}
