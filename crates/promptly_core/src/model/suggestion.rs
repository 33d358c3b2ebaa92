//! AI suggestion model.
//!
//! # Invariants
//! - `owner_id` is the user who triggered generation.
//! - `project_id` and `task_id` are optional and independent of each other.

use crate::model::project::ProjectId;
use crate::model::summarize;
use crate::model::task::TaskId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

pub type SuggestionId = i64;

/// Persisted assistant output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSuggestion {
    pub id: SuggestionId,
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
    /// Generated text, or the inline error string when generation failed.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub owner_id: UserId,
}

impl AiSuggestion {
    /// Short list label: first 50 chars plus `...`.
    pub fn summary(&self) -> String {
        summarize(&self.text)
    }
}

/// Insert payload for a new suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub owner_id: UserId,
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
    pub text: String,
}
