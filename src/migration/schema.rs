//! Registry of the persisted document's schema generations.
//!
//! Each generation records the fields it introduced, the storage key it was
//! persisted under, and the structural rule an import of that generation must
//! satisfy. A new generation is added by appending a variant and filling in
//! its tables; nothing already listed is ever edited.

use serde_json::{Map, Value};

use crate::document::{generate_id, now_iso};

/// How an absent field is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    EmptyString,
    EmptyArray,
    False,
    /// `{ "cards": [] }`
    EmptyNode,
    /// A fresh opaque id.
    GeneratedId,
    /// The current timestamp.
    Now,
}

impl DefaultValue {
    pub fn materialize(self) -> Value {
        match self {
            DefaultValue::EmptyString => Value::String(String::new()),
            DefaultValue::EmptyArray => Value::Array(Vec::new()),
            DefaultValue::False => Value::Bool(false),
            DefaultValue::EmptyNode => {
                let mut node = Map::new();
                node.insert("cards".to_string(), Value::Array(Vec::new()));
                Value::Object(node)
            }
            DefaultValue::GeneratedId => Value::String(generate_id()),
            DefaultValue::Now => Value::String(now_iso()),
        }
    }
}

/// A field and the value it takes when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefault {
    pub key: &'static str,
    pub default: DefaultValue,
}

const fn field(key: &'static str, default: DefaultValue) -> FieldDefault {
    FieldDefault { key, default }
}

use DefaultValue::*;

const V1_STEP_FIELDS: &[FieldDefault] = &[
    field("id", GeneratedId),
    field("name", EmptyString),
    field("currentScenario", EmptyString),
    field("futureScenario", EmptyString),
    field("noImprovement", False),
    field("userCards", EmptyArray),
];

const V2_STEP_FIELDS: &[FieldDefault] = &[
    field("role", EmptyString),
    field("idealScenario", EmptyString),
    field("inputs", EmptyArray),
    field("outputs", EmptyArray),
    field("mappings", EmptyArray),
];

const V1_DOCUMENT_FIELDS: &[FieldDefault] = &[
    field("id", GeneratedId),
    field("title", EmptyString),
    field("theme", EmptyString),
    field("sectors", EmptyString),
    field("managers", EmptyString),
    field("updatedAt", Now),
];

const V2_DOCUMENT_FIELDS: &[FieldDefault] = &[
    field("deliverables", EmptyArray),
    field("justification", EmptyString),
    field("objective", EmptyString),
    field("requirements", EmptyArray),
    field("processRules", EmptyArray),
    field("risks", EmptyArray),
    field("startNode", EmptyNode),
    field("endNode", EmptyNode),
    field("deipItems", EmptyArray),
];

/// A generation of the persisted document schema, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Flat `steps[]` with the first step fields only.
    V1,
    /// Flat `steps[]` enriched with roles, scenarios, inputs/outputs and
    /// mappings; project framing, deliverables, start/end nodes, DEIP items.
    V2,
    /// `flows[]` of `steps[]`; `steps` kept as an always-empty field.
    V3,
}

impl SchemaVersion {
    /// The full lineage, oldest first.
    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::V1, SchemaVersion::V2, SchemaVersion::V3];

    /// The generation this crate writes.
    pub const CURRENT: SchemaVersion = SchemaVersion::V3;

    /// Step fields first introduced by this generation.
    pub fn introduced_step_fields(self) -> &'static [FieldDefault] {
        match self {
            SchemaVersion::V1 => V1_STEP_FIELDS,
            SchemaVersion::V2 => V2_STEP_FIELDS,
            SchemaVersion::V3 => &[],
        }
    }

    /// Document fields first introduced by this generation.
    ///
    /// V3's `flows` is not listed: it is produced by the flow reconciler,
    /// never by plain defaulting.
    pub fn introduced_document_fields(self) -> &'static [FieldDefault] {
        match self {
            SchemaVersion::V1 => V1_DOCUMENT_FIELDS,
            SchemaVersion::V2 => V2_DOCUMENT_FIELDS,
            SchemaVersion::V3 => &[],
        }
    }

    /// Every step field known up to and including the current generation.
    pub fn all_step_fields() -> impl Iterator<Item = &'static FieldDefault> {
        Self::ALL
            .iter()
            .flat_map(|v| v.introduced_step_fields().iter())
    }

    /// Every document field known up to and including the current generation.
    pub fn all_document_fields() -> impl Iterator<Item = &'static FieldDefault> {
        Self::ALL
            .iter()
            .flat_map(|v| v.introduced_document_fields().iter())
    }

    /// Local storage key this generation was persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            SchemaVersion::V1 => "process_improvement_data_v1",
            SchemaVersion::V2 => "process_improvement_data_v2",
            SchemaVersion::V3 => "process_improvement_data_v3",
        }
    }

    /// Older generations, newest first.
    pub fn legacy(self) -> impl Iterator<Item = SchemaVersion> {
        Self::ALL.into_iter().rev().filter(move |v| *v < self)
    }

    /// Structural rule an import of this generation must satisfy.
    ///
    /// V1 and V2 documents carried a flat `steps` array; V3 dropped that
    /// requirement so flow-only documents are accepted.
    pub fn accepts(self, raw: &Value) -> bool {
        let Some(obj) = raw.as_object() else {
            return false;
        };
        let has_title = obj.get("title").is_some_and(Value::is_string);
        match self {
            SchemaVersion::V1 | SchemaVersion::V2 => {
                has_title && obj.get("steps").is_some_and(Value::is_array)
            }
            SchemaVersion::V3 => has_title,
        }
    }

    /// Best guess at which generation produced `raw`. `None` for non-objects.
    pub fn detect(raw: &Value) -> Option<SchemaVersion> {
        raw.as_object().map(Self::detect_map)
    }

    pub fn detect_map(obj: &Map<String, Value>) -> SchemaVersion {
        if obj.get("flows").is_some_and(Value::is_array) {
            return SchemaVersion::V3;
        }

        let has_v2_document_field = V2_DOCUMENT_FIELDS
            .iter()
            .any(|f| obj.contains_key(f.key));
        let has_v2_step_field = obj
            .get("steps")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .any(|step| V2_STEP_FIELDS.iter().any(|f| step.contains_key(f.key)));

        if has_v2_document_field || has_v2_step_field {
            SchemaVersion::V2
        } else {
            SchemaVersion::V1
        }
    }
}
