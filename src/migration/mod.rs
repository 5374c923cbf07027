//! Schema compatibility layer for persisted and imported documents.
//!
//! Every externally-sourced document (local storage, imported file) passes
//! through [`ensure_compatible_data`] before it becomes live state.
//!
//! # Pipeline
//!
//! 1. `null` or a non-object becomes a fresh empty document
//! 2. [`flows::reconcile_flows`] migrates legacy flat steps and normalizes
//!    every step
//! 3. [`normalize::normalize_document`] fills document-level defaults
//! 4. the result is deserialized into [`ProcessImprovement`]
//!
//! Steps 1-3 are pure and infallible ([`ensure_compatible_value`]). Only the
//! typed conversion can fail, when a present field holds a JSON type the
//! model cannot represent.

pub mod flows;
pub mod normalize;
pub mod schema;
pub mod validate;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::document::{ProcessImprovement, DEFAULT_PROCESS_TITLE};
use crate::error::DocumentError;

pub use flows::{reconcile_flows, FlowMigration};
pub use normalize::{normalize_document, normalize_flow, normalize_step};
pub use schema::SchemaVersion;
pub use validate::validate_process_json;

fn empty_seed() -> Map<String, Value> {
    let mut seed = Map::new();
    seed.insert(
        "title".to_string(),
        Value::String(DEFAULT_PROCESS_TITLE.to_string()),
    );
    seed
}

/// Bring any parsed JSON value to the current document shape.
///
/// The output always has a non-empty `flows` array, an empty `steps` array,
/// and every optional field materialized. Applying it twice yields the same
/// structure as applying it once.
pub fn ensure_compatible_value(raw: Value) -> Value {
    let mut doc = match raw {
        Value::Object(map) => map,
        Value::Null => empty_seed(),
        other => {
            warn!(
                "Expected a document object, found {}; starting from an empty document",
                normalize::json_kind(&other)
            );
            empty_seed()
        }
    };

    let detected = SchemaVersion::detect_map(&doc);
    let migration = reconcile_flows(&mut doc);
    normalize_document(&mut doc);

    debug!(
        "Normalized document from {:?} to {:?} ({:?})",
        detected,
        SchemaVersion::CURRENT,
        migration
    );
    Value::Object(doc)
}

/// Typed entry point: normalize, then deserialize into the document model.
pub fn ensure_compatible_data(raw: Value) -> Result<ProcessImprovement, DocumentError> {
    serde_json::from_value(ensure_compatible_value(raw)).map_err(DocumentError::Shape)
}
