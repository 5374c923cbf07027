//! Document core of the ProcessFlow improvement-project editor.
//!
//! Every document that enters the editor, whether restored from local storage
//! or imported from a file, passes through [`ensure_compatible_data`] and
//! comes out in the current schema.

pub mod autosave;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod export;
pub mod migration;
pub mod storage;

pub use config::{default_config, load_config, EditorConfig};
pub use document::ProcessImprovement;
pub use editor::{Editor, Notification, NotificationKind};
pub use error::{DocumentError, ExportError, ImportError, StorageError};
pub use export::{ExportFormat, ReportMode};
pub use migration::{ensure_compatible_data, validate_process_json, SchemaVersion};

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
