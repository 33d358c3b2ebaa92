//! Request handlers.
//!
//! Every handler moves its work onto the blocking pool via
//! [`crate::state::AppState::run`] and resolves the caller as the first step
//! inside it.

use crate::error::ApiError;
use promptly_core::model::validation::ValidationErrors;
use promptly_core::repo::project_repo::SqliteProjectRepository;
use promptly_core::repo::suggestion_repo::SqliteSuggestionRepository;
use promptly_core::repo::task_repo::SqliteTaskRepository;
use promptly_core::service::project_service::ProjectService;
use promptly_core::service::suggestion_service::SuggestionService;
use promptly_core::service::task_service::TaskService;
use promptly_core::{AiSuggestion, ServiceError, Task};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{json, Value};

pub mod accounts;
pub mod index;
pub mod projects;
pub mod suggestions;
pub mod tasks;

/// Single-field form shared by project, task and suggestion edits.
#[derive(Debug, Default, Deserialize)]
pub struct TextForm {
    #[serde(default)]
    pub text: String,
}

type Projects<'conn> = ProjectService<SqliteProjectRepository<'conn>, SqliteTaskRepository<'conn>>;
type Tasks<'conn> = TaskService<SqliteProjectRepository<'conn>, SqliteTaskRepository<'conn>>;
type Suggestions<'conn> =
    SuggestionService<SqliteSuggestionRepository<'conn>, SqliteProjectRepository<'conn>>;

pub(crate) fn project_service(conn: &Connection) -> Result<Projects<'_>, ApiError> {
    Ok(ProjectService::new(
        SqliteProjectRepository::try_new(conn)?,
        SqliteTaskRepository::try_new(conn)?,
    ))
}

pub(crate) fn task_service(conn: &Connection) -> Result<Tasks<'_>, ApiError> {
    Ok(TaskService::new(
        SqliteProjectRepository::try_new(conn)?,
        SqliteTaskRepository::try_new(conn)?,
    ))
}

pub(crate) fn suggestion_service(conn: &Connection) -> Result<Suggestions<'_>, ApiError> {
    Ok(SuggestionService::new(
        SqliteSuggestionRepository::try_new(conn)?,
        SqliteProjectRepository::try_new(conn)?,
    ))
}

/// Parses an optional numeric id; blank means absent.
pub(crate) fn parse_optional_id(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<i64>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i64>().map(Some).map_err(|_| {
        ServiceError::Validation(ValidationErrors::single(field, "Enter a whole number.")).into()
    })
}

pub(crate) fn task_json(task: &Task) -> Value {
    json!({
        "id": task.id,
        "project_id": task.project_id,
        "text": task.text,
        "summary": task.summary(),
        "created_at": task.created_at,
    })
}

pub(crate) fn suggestion_json(suggestion: &AiSuggestion) -> Value {
    json!({
        "id": suggestion.id,
        "project_id": suggestion.project_id,
        "task_id": suggestion.task_id,
        "text": suggestion.text,
        "summary": suggestion.summary(),
        "created_at": suggestion.created_at,
    })
}

/// Fallback for POST-only routes. Runs behind the token guard.
pub async fn invalid_method() -> ApiError {
    ApiError::InvalidMethod
}
