//! Core domain logic for Promptly.
//! Persistence, ownership rules and suggestion generation live here; the
//! HTTP crate only maps requests onto these services.

pub mod db;
pub mod llm;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use llm::client::{ChatChunk, ChatCompletion, ChatError, ChatResult, ChatStream};
pub use llm::generator::{SuggestionGenerator, DEFAULT_MODEL, GENERATION_ERROR_PREFIX};
pub use llm::ollama::{OllamaClient, DEFAULT_OLLAMA_URL};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::chat::{ChatMessage, Role};
pub use model::project::{Project, ProjectId};
pub use model::suggestion::{AiSuggestion, SuggestionId};
pub use model::task::{OwnedTask, Task, TaskId};
pub use model::user::{User, UserId};
pub use model::validation::{FieldError, ValidationErrors};
pub use repo::{RepoError, RepoResult};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
