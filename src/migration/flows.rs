//! Flow reconciler: turns the legacy flat step list into the multi-flow
//! structure, or passes an already-current `flows` array through.

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::normalize::{for_each_object, normalize_flow};
use crate::document::{generate_id, DEFAULT_FLOW_NAME};

/// Which migration path a document took. Exactly one applies per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMigration {
    /// `flows` was already present; any legacy steps were discarded.
    Existing { flows: usize, discarded_steps: usize },
    /// Legacy `steps` were wrapped into a single synthesized flow.
    AbsorbedLegacySteps { steps: usize },
    /// Neither flows nor steps: a single empty flow was created.
    Synthesized,
}

fn synthesized_flow(steps: Vec<Value>) -> Value {
    let mut flow = Map::new();
    flow.insert("id".to_string(), Value::String(generate_id()));
    flow.insert(
        "name".to_string(),
        Value::String(DEFAULT_FLOW_NAME.to_string()),
    );
    flow.insert("steps".to_string(), Value::Array(steps));
    Value::Object(flow)
}

/// Reconcile `flows` and the legacy `steps` field of a document object.
///
/// Afterwards `flows` is a non-empty array, every step inside it is
/// normalized, and `steps` is an empty array. Flows and legacy steps are
/// never merged: when a non-empty `flows` array exists, it wins and the
/// legacy list is dropped.
pub fn reconcile_flows(doc: &mut Map<String, Value>) -> FlowMigration {
    let legacy = doc.remove("steps");
    let existing_flows = match doc.get("flows") {
        Some(Value::Array(flows)) if !flows.is_empty() => Some(flows.len()),
        _ => None,
    };

    let outcome = match (existing_flows, legacy) {
        (Some(flows), legacy) => {
            let discarded_steps = match legacy {
                Some(Value::Array(steps)) => steps.len(),
                _ => 0,
            };
            if discarded_steps > 0 {
                warn!(
                    "Document has both flows and {} legacy steps; legacy steps discarded",
                    discarded_steps
                );
            }
            FlowMigration::Existing {
                flows,
                discarded_steps,
            }
        }
        (None, Some(Value::Array(steps))) if !steps.is_empty() => {
            let count = steps.len();
            doc.insert(
                "flows".to_string(),
                Value::Array(vec![synthesized_flow(steps)]),
            );
            info!("Migrated {} legacy steps into '{}'", count, DEFAULT_FLOW_NAME);
            FlowMigration::AbsorbedLegacySteps { steps: count }
        }
        (None, _) => {
            doc.insert(
                "flows".to_string(),
                Value::Array(vec![synthesized_flow(Vec::new())]),
            );
            FlowMigration::Synthesized
        }
    };

    for_each_object(doc, "flows", normalize_flow);
    doc.insert("steps".to_string(), Value::Array(Vec::new()));

    outcome
}
