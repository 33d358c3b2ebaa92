//! Project repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Owner lists are ordered oldest-first (`created_at ASC, id ASC`).
//! - Deleting a project relies on foreign-key cascades to drop its tasks
//!   and suggestions in the same statement.

use crate::model::project::{Project, ProjectId};
use crate::model::user::UserId;
use crate::repo::{count_to_u64, ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    text,
    created_at,
    owner_id
FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, owner_id: UserId, text: &str) -> RepoResult<Project>;
    /// Unscoped lookup; ownership is decided by the caller.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self, owner_id: UserId) -> RepoResult<Vec<Project>>;
    fn update_project_text(&self, id: ProjectId, text: &str) -> RepoResult<Project>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    fn count_projects(&self, owner_id: UserId) -> RepoResult<u64>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "projects")?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, owner_id: UserId, text: &str) -> RepoResult<Project> {
        let project = self.conn.query_row(
            "INSERT INTO projects (text, owner_id) VALUES (?1, ?2)
             RETURNING id, text, created_at, owner_id;",
            params![text, owner_id],
            parse_project_row,
        )?;
        Ok(project)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self, owner_id: UserId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn update_project_text(&self, id: ProjectId, text: &str) -> RepoResult<Project> {
        let mut stmt = self.conn.prepare(
            "UPDATE projects SET text = ?2 WHERE id = ?1
             RETURNING id, text, created_at, owner_id;",
        )?;
        let mut rows = stmt.query(params![id, text])?;
        if let Some(row) = rows.next()? {
            return Ok(parse_project_row(row)?);
        }
        Err(RepoError::NotFound {
            entity: "project",
            id,
        })
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    fn count_projects(&self, owner_id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE owner_id = ?1;",
            [owner_id],
            |row| row.get(0),
        )?;
        count_to_u64(count, "projects")
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        text: row.get(1)?,
        created_at: row.get(2)?,
        owner_id: row.get(3)?,
    })
}
