//! Task model.
//!
//! # Invariants
//! - A task always belongs to exactly one project.
//! - Ownership is never stored on the task; it is read through the parent.

use crate::model::project::ProjectId;
use crate::model::summarize;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

/// Something specific tracked about a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    /// Free-form body.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Short list label: first 50 chars plus `...`.
    pub fn summary(&self) -> String {
        summarize(&self.text)
    }
}

/// Task joined with the owner of its parent project.
///
/// Used by authorization paths so the transitive owner check needs one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedTask {
    pub task: Task,
    pub project_owner_id: UserId,
}

impl OwnedTask {
    /// Returns whether `user_id` owns the parent project.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.project_owner_id == user_id
    }
}
