//! Editing operations on the typed document.
//!
//! Every operation keeps the document invariants: at least one flow, the
//! legacy `steps` list untouched (empty), ids assigned once at creation.

use std::collections::HashSet;

use serde_json::Map;

use super::id::{generate_id, today_iso};
use super::types::{
    DeipCategory, DeipItem, Deliverable, MappingNote, ProcessFlow, ProcessImprovement,
    ProcessNode, ProcessStep, SimpleCard, StoryPriority, UserCard, UserStory,
};

/// Editing cap on stories per user card. Loading never truncates.
pub const MAX_STORIES_PER_CARD: usize = 5;

/// Name given to a step created from the editor.
pub const NEW_STEP_NAME: &str = "Nova Etapa";
/// Title given to a deliverable created from the editor.
pub const NEW_DELIVERABLE_TITLE: &str = "Nova Entrega";

/// Which of the two process boundary nodes to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Start,
    End,
}

/// A user story together with where it lives in the document.
#[derive(Debug, Clone, Copy)]
pub struct StoryRef<'a> {
    pub flow: &'a ProcessFlow,
    pub step: &'a ProcessStep,
    pub card: &'a UserCard,
    pub story: &'a UserStory,
}

/// A deliverable link pointing at a story id that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub deliverable_id: String,
    pub story_id: String,
}

impl UserStory {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            priority: StoryPriority::Essential,
        }
    }
}

impl UserCard {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            user_name: user_name.into(),
            stories: Vec::new(),
        }
    }

    /// Append a story. Returns `None` once the card holds
    /// [`MAX_STORIES_PER_CARD`] stories.
    pub fn add_story(&mut self, text: impl Into<String>) -> Option<&mut UserStory> {
        if self.stories.len() >= MAX_STORIES_PER_CARD {
            return None;
        }
        self.stories.push(UserStory::new(text));
        self.stories.last_mut()
    }

    pub fn remove_story(&mut self, story_id: &str) -> bool {
        let before = self.stories.len();
        self.stories.retain(|s| s.id != story_id);
        self.stories.len() != before
    }
}

impl MappingNote {
    /// A new mapping note dated today.
    pub fn new(interviewee: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            interviewee: interviewee.into(),
            date: today_iso(),
            notes: String::new(),
        }
    }
}

impl ProcessStep {
    /// A step with every field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            role: String::new(),
            current_scenario: String::new(),
            future_scenario: String::new(),
            ideal_scenario: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            no_improvement: false,
            attention: None,
            user_cards: Vec::new(),
            mappings: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn add_user_card(&mut self, user_name: impl Into<String>) -> &mut UserCard {
        self.user_cards.push(UserCard::new(user_name));
        let last = self.user_cards.len() - 1;
        &mut self.user_cards[last]
    }

    pub fn add_mapping(&mut self, interviewee: impl Into<String>) -> &mut MappingNote {
        self.mappings.push(MappingNote::new(interviewee));
        let last = self.mappings.len() - 1;
        &mut self.mappings[last]
    }
}

impl ProcessFlow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            steps: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl SimpleCard {
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            title: String::new(),
            text: String::new(),
        }
    }
}

impl Default for SimpleCard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeipItem {
    pub fn new(category: DeipCategory) -> Self {
        Self {
            id: generate_id(),
            category,
            title: String::new(),
            description: String::new(),
            attention: false,
        }
    }
}

impl Deliverable {
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            title: NEW_DELIVERABLE_TITLE.to_string(),
            description: String::new(),
            linked_story_ids: Vec::new(),
        }
    }

    /// Link the story if unlinked, unlink it otherwise.
    /// Returns whether the story is linked afterwards.
    pub fn toggle_story_link(&mut self, story_id: &str) -> bool {
        if self.linked_story_ids.iter().any(|id| id == story_id) {
            self.linked_story_ids.retain(|id| id != story_id);
            false
        } else {
            self.linked_story_ids.push(story_id.to_string());
            true
        }
    }
}

impl Default for Deliverable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessImprovement {
    // --- Flows ---

    pub fn flow(&self, flow_id: &str) -> Option<&ProcessFlow> {
        self.flows.iter().find(|f| f.id == flow_id)
    }

    pub fn flow_mut(&mut self, flow_id: &str) -> Option<&mut ProcessFlow> {
        self.flows.iter_mut().find(|f| f.id == flow_id)
    }

    pub fn add_flow(&mut self, name: impl Into<String>) -> &mut ProcessFlow {
        self.flows.push(ProcessFlow::new(name));
        let last = self.flows.len() - 1;
        &mut self.flows[last]
    }

    pub fn rename_flow(&mut self, flow_id: &str, name: impl Into<String>) -> bool {
        match self.flow_mut(flow_id) {
            Some(flow) => {
                flow.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove a flow. The last remaining flow cannot be removed.
    pub fn remove_flow(&mut self, flow_id: &str) -> bool {
        if self.flows.len() <= 1 {
            return false;
        }
        let before = self.flows.len();
        self.flows.retain(|f| f.id != flow_id);
        self.flows.len() != before
    }

    // --- Steps ---

    /// Iterate over every step of every flow, in order.
    pub fn all_steps(&self) -> impl Iterator<Item = &ProcessStep> {
        self.flows.iter().flat_map(|f| f.steps.iter())
    }

    pub fn step(&self, step_id: &str) -> Option<&ProcessStep> {
        self.all_steps().find(|s| s.id == step_id)
    }

    pub fn step_mut(&mut self, step_id: &str) -> Option<&mut ProcessStep> {
        self.flows
            .iter_mut()
            .flat_map(|f| f.steps.iter_mut())
            .find(|s| s.id == step_id)
    }

    /// Append a new "Nova Etapa" step to the given flow.
    pub fn add_step(&mut self, flow_id: &str) -> Option<&mut ProcessStep> {
        let flow = self.flow_mut(flow_id)?;
        flow.steps.push(ProcessStep::new(NEW_STEP_NAME));
        flow.steps.last_mut()
    }

    /// Remove a step from whichever flow holds it.
    pub fn remove_step(&mut self, step_id: &str) -> bool {
        for flow in &mut self.flows {
            if let Some(pos) = flow.steps.iter().position(|s| s.id == step_id) {
                flow.steps.remove(pos);
                return true;
            }
        }
        false
    }

    /// Move a step within a flow: remove at `from`, insert at `to`.
    pub fn move_step(&mut self, flow_id: &str, from: usize, to: usize) -> bool {
        let Some(flow) = self.flow_mut(flow_id) else {
            return false;
        };
        if from >= flow.steps.len() || to >= flow.steps.len() {
            return false;
        }
        if from != to {
            let step = flow.steps.remove(from);
            flow.steps.insert(to, step);
        }
        true
    }

    // --- Start/end nodes ---

    pub fn node_mut(&mut self, kind: NodeKind) -> &mut ProcessNode {
        match kind {
            NodeKind::Start => &mut self.start_node,
            NodeKind::End => &mut self.end_node,
        }
    }

    pub fn add_node_card(&mut self, kind: NodeKind) -> &mut SimpleCard {
        let node = self.node_mut(kind);
        node.cards.push(SimpleCard::new());
        let last = node.cards.len() - 1;
        &mut node.cards[last]
    }

    pub fn remove_node_card(&mut self, kind: NodeKind, card_id: &str) -> bool {
        let node = self.node_mut(kind);
        let before = node.cards.len();
        node.cards.retain(|c| c.id != card_id);
        node.cards.len() != before
    }

    // --- DEIP items ---

    pub fn add_deip_item(&mut self, category: DeipCategory) -> &mut DeipItem {
        self.deip_items.push(DeipItem::new(category));
        let last = self.deip_items.len() - 1;
        &mut self.deip_items[last]
    }

    pub fn deip_items_by_category(&self, category: &DeipCategory) -> Vec<&DeipItem> {
        self.deip_items
            .iter()
            .filter(|i| &i.category == category)
            .collect()
    }

    pub fn remove_deip_item(&mut self, item_id: &str) -> bool {
        let before = self.deip_items.len();
        self.deip_items.retain(|i| i.id != item_id);
        self.deip_items.len() != before
    }

    // --- Deliverables ---

    pub fn add_deliverable(&mut self) -> &mut Deliverable {
        self.deliverables.push(Deliverable::new());
        let last = self.deliverables.len() - 1;
        &mut self.deliverables[last]
    }

    pub fn deliverable_mut(&mut self, deliverable_id: &str) -> Option<&mut Deliverable> {
        self.deliverables.iter_mut().find(|d| d.id == deliverable_id)
    }

    pub fn remove_deliverable(&mut self, deliverable_id: &str) -> bool {
        let before = self.deliverables.len();
        self.deliverables.retain(|d| d.id != deliverable_id);
        self.deliverables.len() != before
    }

    /// Stories linked to a deliverable, in document order. Dangling ids are skipped.
    pub fn linked_stories(&self, deliverable: &Deliverable) -> Vec<StoryRef<'_>> {
        self.all_stories()
            .into_iter()
            .filter(|r| deliverable.linked_story_ids.iter().any(|id| *id == r.story.id))
            .collect()
    }

    // --- Stories index ---

    /// Every user story in the document, with its flow, step and card.
    pub fn all_stories(&self) -> Vec<StoryRef<'_>> {
        let mut stories = Vec::new();
        for flow in &self.flows {
            for step in &flow.steps {
                for card in &step.user_cards {
                    for story in &card.stories {
                        stories.push(StoryRef {
                            flow,
                            step,
                            card,
                            story,
                        });
                    }
                }
            }
        }
        stories
    }

    /// Deliverable links whose story no longer exists. Read-only: links are
    /// never pruned automatically.
    pub fn dangling_story_links(&self) -> Vec<DanglingLink> {
        let known: HashSet<&str> = self
            .all_stories()
            .into_iter()
            .map(|r| r.story.id.as_str())
            .collect();
        let known = &known;

        self.deliverables
            .iter()
            .flat_map(|d| {
                d.linked_story_ids
                    .iter()
                    .filter(move |id| !known.contains(id.as_str()))
                    .map(move |id| DanglingLink {
                        deliverable_id: d.id.clone(),
                        story_id: id.clone(),
                    })
            })
            .collect()
    }

    // --- Project framing ---

    /// Append a trimmed requirement. Blank input is ignored.
    pub fn add_requirement(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.requirements.push(trimmed.to_string());
        true
    }

    pub fn remove_requirement(&mut self, index: usize) -> Option<String> {
        (index < self.requirements.len()).then(|| self.requirements.remove(index))
    }
}
