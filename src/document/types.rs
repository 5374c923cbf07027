//! Typed model of the persisted ProcessImprovement document.
//!
//! Field names serialize in camelCase, matching the JSON written by every
//! generation of the editor. Types here describe the *current* shape only;
//! older shapes are reconciled by [`crate::migration`] before deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{generate_id, now_iso};

/// Title given to a brand-new document.
pub const DEFAULT_PROCESS_TITLE: &str = "Novo Processo de Melhoria";
/// Name of the flow synthesized for legacy or empty documents.
pub const DEFAULT_FLOW_NAME: &str = "Fluxo Principal";

/// MoSCoW-style priority of a user story.
///
/// Values outside the known set are kept verbatim in `Other` so a document
/// produced by a newer editor survives a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoryPriority {
    #[default]
    Essential,
    ShouldHave,
    CouldHave,
    Other(String),
}

impl StoryPriority {
    pub fn as_str(&self) -> &str {
        match self {
            StoryPriority::Essential => "Essencial",
            StoryPriority::ShouldHave => "Deveria ter",
            StoryPriority::CouldHave => "Poderia ter",
            StoryPriority::Other(s) => s,
        }
    }
}

impl From<String> for StoryPriority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Essencial" => StoryPriority::Essential,
            "Deveria ter" => StoryPriority::ShouldHave,
            "Poderia ter" => StoryPriority::CouldHave,
            _ => StoryPriority::Other(s),
        }
    }
}

impl From<StoryPriority> for String {
    fn from(p: StoryPriority) -> Self {
        match p {
            StoryPriority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Scope category of a DEIP item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeipCategory {
    Policies,
    Inputs,
    Outputs,
    Resources,
    Other(String),
}

impl DeipCategory {
    /// The four categories the editor offers, in display order.
    pub const KNOWN: [DeipCategory; 4] = [
        DeipCategory::Policies,
        DeipCategory::Inputs,
        DeipCategory::Outputs,
        DeipCategory::Resources,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DeipCategory::Policies => "policies",
            DeipCategory::Inputs => "inputs",
            DeipCategory::Outputs => "outputs",
            DeipCategory::Resources => "resources",
            DeipCategory::Other(s) => s,
        }
    }

    /// Display label used in reports.
    pub fn label(&self) -> &str {
        match self {
            DeipCategory::Policies => "Políticas",
            DeipCategory::Inputs => "Entradas",
            DeipCategory::Outputs => "Saídas",
            DeipCategory::Resources => "Recursos",
            DeipCategory::Other(s) => s,
        }
    }
}

impl From<String> for DeipCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "policies" => DeipCategory::Policies,
            "inputs" => DeipCategory::Inputs,
            "outputs" => DeipCategory::Outputs,
            "resources" => DeipCategory::Resources,
            _ => DeipCategory::Other(s),
        }
    }
}

impl From<DeipCategory> for String {
    fn from(c: DeipCategory) -> Self {
        match c {
            DeipCategory::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub id: String,
    pub text: String,
    pub priority: StoryPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub id: String,
    pub user_name: String,
    pub stories: Vec<UserStory>,
}

/// Notes from an interview or mapping session for a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingNote {
    pub id: String,
    pub interviewee: String,
    /// `YYYY-MM-DD`, kept as text.
    pub date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStep {
    pub id: String,
    pub name: String,
    /// Responsible role or sector.
    pub role: String,
    /// As-is description.
    pub current_scenario: String,
    /// To-be description.
    pub future_scenario: String,
    /// What the step could look like without constraints.
    pub ideal_scenario: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub no_improvement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention: Option<bool>,
    pub user_cards: Vec<UserCard>,
    pub mappings: Vec<MappingNote>,
    /// Keys this version does not know about, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFlow {
    pub id: String,
    pub name: String,
    pub steps: Vec<ProcessStep>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ids of `UserStory` values anywhere in the document. Links to deleted
    /// stories are kept as-is.
    pub linked_story_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCard {
    pub id: String,
    pub title: String,
    pub text: String,
}

/// Pre-operational (start) or post-operational (end) items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessNode {
    pub cards: Vec<SimpleCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeipItem {
    pub id: String,
    pub category: DeipCategory,
    pub title: String,
    pub description: String,
    /// Highlight flag.
    pub attention: bool,
}

/// The whole persisted state of one improvement project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImprovement {
    pub id: String,
    pub title: String,
    pub theme: String,
    pub sectors: String,
    pub managers: String,
    pub start_node: ProcessNode,
    pub end_node: ProcessNode,
    /// Never empty once the document has passed through the migration layer.
    pub flows: Vec<ProcessFlow>,
    /// Legacy flat step list. Always empty on a normalized document.
    pub steps: Vec<ProcessStep>,
    pub deliverables: Vec<Deliverable>,
    pub deip_items: Vec<DeipItem>,
    pub justification: String,
    pub objective: String,
    pub requirements: Vec<String>,
    pub process_rules: Vec<String>,
    pub risks: Vec<String>,
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessImprovement {
    /// A fresh document with a single empty flow.
    pub fn empty() -> Self {
        Self {
            id: generate_id(),
            title: DEFAULT_PROCESS_TITLE.to_string(),
            theme: String::new(),
            sectors: String::new(),
            managers: String::new(),
            start_node: ProcessNode::default(),
            end_node: ProcessNode::default(),
            flows: vec![ProcessFlow::new(DEFAULT_FLOW_NAME)],
            steps: Vec::new(),
            deliverables: Vec::new(),
            deip_items: Vec::new(),
            justification: String::new(),
            objective: String::new(),
            requirements: Vec::new(),
            process_rules: Vec::new(),
            risks: Vec::new(),
            updated_at: now_iso(),
            extra: Map::new(),
        }
    }

    /// Refresh `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = now_iso();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_known_values_round_trip() {
        for (raw, expected) in [
            ("Essencial", StoryPriority::Essential),
            ("Deveria ter", StoryPriority::ShouldHave),
            ("Poderia ter", StoryPriority::CouldHave),
        ] {
            let parsed: StoryPriority = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(serde_json::to_value(&parsed).unwrap(), json!(raw));
        }
    }

    #[test]
    fn test_unknown_priority_preserved_verbatim() {
        let parsed: StoryPriority = serde_json::from_value(json!("Urgente!!")).unwrap();
        assert_eq!(parsed, StoryPriority::Other("Urgente!!".to_string()));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!("Urgente!!"));
    }

    #[test]
    fn test_unknown_deip_category_preserved() {
        let parsed: DeipCategory = serde_json::from_value(json!("constraints")).unwrap();
        assert_eq!(parsed.as_str(), "constraints");
        assert_eq!(DeipCategory::from("inputs".to_string()), DeipCategory::Inputs);
    }

    #[test]
    fn test_step_serializes_camel_case_and_skips_absent_attention() {
        let step = ProcessStep::new("Receber pedido");
        let value = serde_json::to_value(&step).unwrap();
        assert!(value.get("currentScenario").is_some());
        assert!(value.get("noImprovement").is_some());
        assert!(value.get("userCards").is_some());
        assert!(value.get("attention").is_none());
    }

    #[test]
    fn test_unknown_step_keys_survive_round_trip() {
        let mut step = serde_json::to_value(ProcessStep::new("A")).unwrap();
        step["durationMinutes"] = json!(45);
        let parsed: ProcessStep = serde_json::from_value(step.clone()).unwrap();
        assert_eq!(parsed.extra.get("durationMinutes"), Some(&json!(45)));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), step);
    }

    #[test]
    fn test_empty_document_shape() {
        let doc = ProcessImprovement::empty();
        assert_eq!(doc.title, DEFAULT_PROCESS_TITLE);
        assert_eq!(doc.flows.len(), 1);
        assert_eq!(doc.flows[0].name, DEFAULT_FLOW_NAME);
        assert!(doc.flows[0].steps.is_empty());
        assert!(doc.steps.is_empty());
        assert!(doc.deliverables.is_empty());
        assert!(doc.deip_items.is_empty());
    }
}
