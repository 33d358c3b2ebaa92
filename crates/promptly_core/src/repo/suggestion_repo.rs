//! AI suggestion repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Every read, update and delete is scoped by `owner_id`; a suggestion
//!   owned by someone else is indistinguishable from a missing one.
//! - Lists are ordered newest-first (`created_at DESC, id DESC`).
//! - Text search is a case-insensitive substring match with LIKE wildcards
//!   in the needle matched literally.

use crate::model::project::ProjectId;
use crate::model::suggestion::{AiSuggestion, NewSuggestion, SuggestionId};
use crate::model::user::UserId;
use crate::repo::{count_to_u64, ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const SUGGESTION_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    task_id,
    text,
    created_at,
    owner_id
FROM ai_suggestions";

/// Query options for listing one owner's suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionListQuery {
    pub owner_id: UserId,
    /// Case-insensitive substring filter on `text`. Blank means no filter.
    pub text_contains: Option<String>,
    /// Exact project filter.
    pub project_id: Option<ProjectId>,
}

impl SuggestionListQuery {
    /// Unfiltered query for `owner_id`.
    pub fn for_owner(owner_id: UserId) -> Self {
        Self {
            owner_id,
            text_contains: None,
            project_id: None,
        }
    }
}

/// Repository interface for suggestion persistence.
pub trait SuggestionRepository {
    fn create_suggestion(&self, suggestion: &NewSuggestion) -> RepoResult<AiSuggestion>;
    fn get_suggestion(&self, id: SuggestionId, owner_id: UserId)
        -> RepoResult<Option<AiSuggestion>>;
    fn list_suggestions(&self, query: &SuggestionListQuery) -> RepoResult<Vec<AiSuggestion>>;
    fn update_suggestion_text(
        &self,
        id: SuggestionId,
        owner_id: UserId,
        text: &str,
    ) -> RepoResult<AiSuggestion>;
    fn delete_suggestion(&self, id: SuggestionId, owner_id: UserId) -> RepoResult<()>;
    fn count_suggestions(&self, owner_id: UserId) -> RepoResult<u64>;
}

/// SQLite-backed suggestion repository.
pub struct SqliteSuggestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSuggestionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "ai_suggestions")?;
        Ok(Self { conn })
    }
}

impl SuggestionRepository for SqliteSuggestionRepository<'_> {
    fn create_suggestion(&self, suggestion: &NewSuggestion) -> RepoResult<AiSuggestion> {
        let created = self.conn.query_row(
            "INSERT INTO ai_suggestions (project_id, task_id, text, owner_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, project_id, task_id, text, created_at, owner_id;",
            params![
                suggestion.project_id,
                suggestion.task_id,
                suggestion.text.as_str(),
                suggestion.owner_id,
            ],
            parse_suggestion_row,
        )?;
        Ok(created)
    }

    fn get_suggestion(
        &self,
        id: SuggestionId,
        owner_id: UserId,
    ) -> RepoResult<Option<AiSuggestion>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUGGESTION_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id, owner_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_suggestion_row(row)?));
        }
        Ok(None)
    }

    fn list_suggestions(&self, query: &SuggestionListQuery) -> RepoResult<Vec<AiSuggestion>> {
        let mut sql = format!("{SUGGESTION_SELECT_SQL} WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Integer(query.owner_id)];

        if let Some(needle) = query
            .text_contains
            .as_deref()
            .filter(|value| !value.is_empty())
        {
            sql.push_str(" AND text LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(format!("%{}%", escape_like(needle))));
        }

        if let Some(project_id) = query.project_id {
            sql.push_str(" AND project_id = ?");
            bind_values.push(Value::Integer(project_id));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut suggestions = Vec::new();
        while let Some(row) = rows.next()? {
            suggestions.push(parse_suggestion_row(row)?);
        }
        Ok(suggestions)
    }

    fn update_suggestion_text(
        &self,
        id: SuggestionId,
        owner_id: UserId,
        text: &str,
    ) -> RepoResult<AiSuggestion> {
        let mut stmt = self.conn.prepare(
            "UPDATE ai_suggestions SET text = ?3 WHERE id = ?1 AND owner_id = ?2
             RETURNING id, project_id, task_id, text, created_at, owner_id;",
        )?;
        let mut rows = stmt.query(params![id, owner_id, text])?;
        if let Some(row) = rows.next()? {
            return Ok(parse_suggestion_row(row)?);
        }
        Err(RepoError::NotFound {
            entity: "suggestion",
            id,
        })
    }

    fn delete_suggestion(&self, id: SuggestionId, owner_id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM ai_suggestions WHERE id = ?1 AND owner_id = ?2;",
            params![id, owner_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "suggestion",
                id,
            });
        }
        Ok(())
    }

    fn count_suggestions(&self, owner_id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM ai_suggestions WHERE owner_id = ?1;",
            [owner_id],
            |row| row.get(0),
        )?;
        count_to_u64(count, "ai_suggestions")
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_suggestion_row(row: &Row<'_>) -> rusqlite::Result<AiSuggestion> {
    Ok(AiSuggestion {
        id: row.get(0)?,
        project_id: row.get(1)?,
        task_id: row.get(2)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
        owner_id: row.get(5)?,
    })
}
