//! Project model.
//!
//! # Invariants
//! - `owner_id` is set at creation and never changes.
//! - `text` is trimmed, non-empty and at most [`PROJECT_TEXT_MAX_CHARS`] chars.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

pub type ProjectId = i64;

/// Maximum label length accepted for a project.
pub const PROJECT_TEXT_MAX_CHARS: usize = 200;

/// A project the user is working on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Short label.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub owner_id: UserId,
}

impl Project {
    /// Returns whether `user_id` owns this project.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}
