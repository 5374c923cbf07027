//! Field normalizer: completes partially-shaped objects with defaults.
//!
//! A field counts as absent when its key is missing or holds `null`. Present
//! values are never touched, whatever their content: an unknown priority or
//! an explicitly empty string passes through as-is. Every function here is
//! idempotent.

use serde_json::{Map, Value};
use tracing::warn;

use super::schema::{DefaultValue, FieldDefault, SchemaVersion};

use DefaultValue::*;

const FLOW_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "name", default: EmptyString },
    FieldDefault { key: "steps", default: EmptyArray },
];

const USER_CARD_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "userName", default: EmptyString },
    FieldDefault { key: "stories", default: EmptyArray },
];

const USER_STORY_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "text", default: EmptyString },
];

/// Priority given to a story that has none.
const DEFAULT_PRIORITY: &str = "Essencial";

const MAPPING_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "interviewee", default: EmptyString },
    FieldDefault { key: "date", default: EmptyString },
    FieldDefault { key: "notes", default: EmptyString },
];

const SIMPLE_CARD_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "title", default: EmptyString },
    FieldDefault { key: "text", default: EmptyString },
];

const DELIVERABLE_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "title", default: EmptyString },
    FieldDefault { key: "description", default: EmptyString },
    FieldDefault { key: "linkedStoryIds", default: EmptyArray },
];

// No `category` default: there is no neutral category.
const DEIP_ITEM_FIELDS: &[FieldDefault] = &[
    FieldDefault { key: "id", default: GeneratedId },
    FieldDefault { key: "title", default: EmptyString },
    FieldDefault { key: "description", default: EmptyString },
    FieldDefault { key: "attention", default: False },
];

/// Whether `key` is missing or `null`.
pub fn is_absent(obj: &Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), None | Some(Value::Null))
}

/// Materialize every absent field from `fields`. Returns how many were filled.
pub fn apply_defaults<'a>(
    obj: &mut Map<String, Value>,
    fields: impl IntoIterator<Item = &'a FieldDefault>,
) -> usize {
    let mut filled = 0;
    for f in fields {
        if is_absent(obj, f.key) {
            obj.insert(f.key.to_string(), f.default.materialize());
            filled += 1;
        }
    }
    filled
}

/// Run `f` on every object element of the array at `key`.
///
/// Non-object elements are left in place (no coercion); they are logged so a
/// later typed conversion failure can be traced back.
pub fn for_each_object(
    obj: &mut Map<String, Value>,
    key: &str,
    mut f: impl FnMut(&mut Map<String, Value>),
) {
    let Some(Value::Array(items)) = obj.get_mut(key) else {
        return;
    };
    for (idx, item) in items.iter_mut().enumerate() {
        match item {
            Value::Object(inner) => f(inner),
            other => warn!(
                "Skipping non-object entry {} in '{}': {}",
                idx,
                key,
                json_kind(other)
            ),
        }
    }
}

/// Short name of a JSON value's type, for log messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Complete a step from any schema generation into the current shape.
pub fn normalize_step(step: &mut Map<String, Value>) {
    apply_defaults(step, SchemaVersion::all_step_fields());
    for_each_object(step, "userCards", normalize_user_card);
    for_each_object(step, "mappings", |m| {
        apply_defaults(m, MAPPING_FIELDS);
    });
}

pub fn normalize_user_card(card: &mut Map<String, Value>) {
    apply_defaults(card, USER_CARD_FIELDS);
    for_each_object(card, "stories", |story| {
        apply_defaults(story, USER_STORY_FIELDS);
        if is_absent(story, "priority") {
            story.insert(
                "priority".to_string(),
                Value::String(DEFAULT_PRIORITY.to_string()),
            );
        }
    });
}

/// Complete a flow and every step inside it.
pub fn normalize_flow(flow: &mut Map<String, Value>) {
    apply_defaults(flow, FLOW_FIELDS);
    for_each_object(flow, "steps", normalize_step);
}

fn normalize_node(node: &mut Map<String, Value>) {
    if is_absent(node, "cards") {
        node.insert("cards".to_string(), Value::Array(Vec::new()));
    }
    for_each_object(node, "cards", |card| {
        apply_defaults(card, SIMPLE_CARD_FIELDS);
    });
}

/// Complete the document-level fields (everything except `flows`/`steps`,
/// which belong to the flow reconciler).
pub fn normalize_document(doc: &mut Map<String, Value>) {
    apply_defaults(doc, SchemaVersion::all_document_fields());

    for key in ["startNode", "endNode"] {
        if let Some(Value::Object(node)) = doc.get_mut(key) {
            normalize_node(node);
        }
    }
    for_each_object(doc, "deliverables", |d| {
        apply_defaults(d, DELIVERABLE_FIELDS);
    });
    for_each_object(doc, "deipItems", |item| {
        apply_defaults(item, DEIP_ITEM_FIELDS);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_v1_step_gets_v2_defaults() {
        let mut step = obj(json!({
            "id": "s1",
            "name": "A",
            "currentScenario": "",
            "futureScenario": "",
            "noImprovement": false,
            "userCards": []
        }));
        normalize_step(&mut step);

        assert_eq!(step["role"], json!(""));
        assert_eq!(step["idealScenario"], json!(""));
        assert_eq!(step["inputs"], json!([]));
        assert_eq!(step["outputs"], json!([]));
        assert_eq!(step["mappings"], json!([]));
        assert_eq!(step["id"], json!("s1"));
        assert!(step.get("attention").is_none());
    }

    #[test]
    fn test_present_mappings_preserved_verbatim() {
        let mappings = json!([{
            "id": "m1",
            "interviewee": "Joana",
            "date": "2024-03-01",
            "notes": "Entrevista inicial"
        }]);
        let mut step = obj(json!({"id": "s1", "mappings": mappings.clone()}));
        normalize_step(&mut step);
        assert_eq!(step["mappings"], mappings);
    }

    #[test]
    fn test_present_values_not_coerced() {
        let mut step = obj(json!({
            "id": "s1",
            "role": "",
            "noImprovement": true,
            "userCards": [{
                "id": "c1",
                "userName": "Ana",
                "stories": [{"id": "h1", "text": "x", "priority": "Urgentissimo"}]
            }]
        }));
        normalize_step(&mut step);

        assert_eq!(step["role"], json!(""));
        assert_eq!(step["noImprovement"], json!(true));
        assert_eq!(
            step["userCards"][0]["stories"][0]["priority"],
            json!("Urgentissimo")
        );
    }

    #[test]
    fn test_null_treated_as_absent() {
        let mut step = obj(json!({"id": "s1", "inputs": null}));
        normalize_step(&mut step);
        assert_eq!(step["inputs"], json!([]));
    }

    #[test]
    fn test_story_priority_defaulted_when_missing() {
        let mut card = obj(json!({"id": "c1", "stories": [{"id": "h1"}]}));
        normalize_user_card(&mut card);
        assert_eq!(card["userName"], json!(""));
        assert_eq!(card["stories"][0]["priority"], json!("Essencial"));
        assert_eq!(card["stories"][0]["text"], json!(""));
    }

    #[test]
    fn test_step_normalization_idempotent() {
        let mut step = obj(json!({"name": "A", "userCards": [{"stories": [{}]}]}));
        normalize_step(&mut step);
        let once = step.clone();
        normalize_step(&mut step);
        assert_eq!(step, once);
    }

    #[test]
    fn test_non_object_entries_left_in_place() {
        let mut flow = obj(json!({"id": "f1", "name": "F", "steps": [42, {"id": "s1"}]}));
        normalize_flow(&mut flow);
        assert_eq!(flow["steps"][0], json!(42));
        assert_eq!(flow["steps"][1]["role"], json!(""));
    }

    #[test]
    fn test_document_defaults() {
        let mut doc = obj(json!({"title": "P"}));
        normalize_document(&mut doc);

        for key in ["deliverables", "requirements", "processRules", "risks", "deipItems"] {
            assert_eq!(doc[key], json!([]), "{} should default to []", key);
        }
        for key in ["justification", "objective", "theme", "sectors", "managers"] {
            assert_eq!(doc[key], json!(""), "{} should default to \"\"", key);
        }
        assert_eq!(doc["startNode"], json!({"cards": []}));
        assert_eq!(doc["endNode"], json!({"cards": []}));
        assert!(doc["id"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(doc["updatedAt"].is_string());
        assert_eq!(doc["title"], json!("P"));
    }

    #[test]
    fn test_explicit_empty_justification_kept() {
        let mut doc = obj(json!({"title": "P", "justification": "", "objective": "Reduzir prazo"}));
        normalize_document(&mut doc);
        assert_eq!(doc["justification"], json!(""));
        assert_eq!(doc["objective"], json!("Reduzir prazo"));
    }

    #[test]
    fn test_nested_document_objects_completed() {
        let mut doc = obj(json!({
            "title": "P",
            "startNode": {},
            "endNode": {"cards": [{"id": "k1", "title": "Fim"}]},
            "deliverables": [{"id": "d1", "title": "Portal"}],
            "deipItems": [{"id": "i1", "category": "inputs"}]
        }));
        normalize_document(&mut doc);

        assert_eq!(doc["startNode"], json!({"cards": []}));
        assert_eq!(doc["endNode"]["cards"][0]["text"], json!(""));
        assert_eq!(doc["deliverables"][0]["linkedStoryIds"], json!([]));
        assert_eq!(doc["deipItems"][0]["attention"], json!(false));
        assert!(doc["deipItems"][0].get("category").is_some());
    }
}
