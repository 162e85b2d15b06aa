//! Micro-action record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::categories::{Category, ConditionTag};

/// A short, concrete action the user can do in a few minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroAction {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Step-by-step instructions
    pub instructions: String,
    /// Category used for selection
    pub category: Category,
    /// Expected duration in seconds
    pub duration_seconds: u32,
    /// Contexts this action suits (trigger or event names, e.g. "morning", "heavy_night")
    pub context_tags: Vec<String>,
    /// Conditions this action is suited for
    pub condition_tags: Vec<ConditionTag>,
    /// Inactive actions are never suggested
    pub is_active: bool,
}

impl MicroAction {
    /// Create a new active micro-action with a generated ID.
    pub fn new(title: impl Into<String>, category: Category, duration_seconds: u32) -> Self {
        Self::with_id(Uuid::new_v4(), title, category, duration_seconds)
    }

    /// Create a new active micro-action with a caller-provided ID.
    pub fn with_id(
        id: Uuid,
        title: impl Into<String>,
        category: Category,
        duration_seconds: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            instructions: String::new(),
            category,
            duration_seconds,
            context_tags: Vec::new(),
            condition_tags: Vec::new(),
            is_active: true,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_context_tags(mut self, tags: &[&str]) -> Self {
        self.context_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_condition_tags(mut self, tags: Vec<ConditionTag>) -> Self {
        self.condition_tags = tags;
        self
    }

    /// Whether any context tag equals `tag`.
    pub fn has_context(&self, tag: &str) -> bool {
        self.context_tags.iter().any(|t| t == tag)
    }

    /// Number of the given conditions this action is tagged for.
    pub fn condition_matches(&self, conditions: &[ConditionTag]) -> usize {
        self.condition_tags
            .iter()
            .filter(|c| conditions.contains(c))
            .count()
    }

    /// Duration formatted as "m:ss".
    pub fn duration_display(&self) -> String {
        format!("{}:{:02}", self.duration_seconds / 60, self.duration_seconds % 60)
    }
}
