//! Domain model for projects, tasks and AI suggestions.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and the server.
//! - Define validated input types replacing free-form form posts.
//!
//! # Invariants
//! - Every project has exactly one owner.
//! - Every task belongs to exactly one project.
//! - Suggestion project/task links are optional and independent.

pub mod chat;
pub mod project;
pub mod suggestion;
pub mod task;
pub mod user;
pub mod validation;

/// Length of the short label rendered for long text bodies.
pub const SUMMARY_CHARS: usize = 50;

/// Returns the first [`SUMMARY_CHARS`] characters of `text` followed by `...`.
pub fn summarize(text: &str) -> String {
    let mut summary = text.chars().take(SUMMARY_CHARS).collect::<String>();
    summary.push_str("...");
    summary
}
