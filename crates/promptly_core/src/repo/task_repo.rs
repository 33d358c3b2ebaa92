//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Task lists are ordered newest-first (`created_at DESC, id DESC`).
//! - Reads used for authorization always carry the parent project's owner.

use crate::model::project::ProjectId;
use crate::model::task::{OwnedTask, Task, TaskId};
use crate::model::user::UserId;
use crate::repo::{count_to_u64, ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    /// Creates one task under `project_id`. The parent must exist.
    fn create_task(&self, project_id: ProjectId, text: &str) -> RepoResult<Task>;
    /// Unscoped lookup joined with the parent project's owner.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<OwnedTask>>;
    fn list_tasks(&self, project_id: ProjectId) -> RepoResult<Vec<Task>>;
    fn update_task_text(&self, id: TaskId, text: &str) -> RepoResult<Task>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Counts tasks whose parent project is owned by `owner_id`.
    fn count_tasks_for_owner(&self, owner_id: UserId) -> RepoResult<u64>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks")?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, project_id: ProjectId, text: &str) -> RepoResult<Task> {
        let task = self.conn.query_row(
            "INSERT INTO tasks (project_id, text) VALUES (?1, ?2)
             RETURNING id, project_id, text, created_at;",
            params![project_id, text],
            parse_task_row,
        )?;
        Ok(task)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<OwnedTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                tasks.id,
                tasks.project_id,
                tasks.text,
                tasks.created_at,
                projects.owner_id
             FROM tasks
             INNER JOIN projects ON projects.id = tasks.project_id
             WHERE tasks.id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(OwnedTask {
                task: parse_task_row(row)?,
                project_owner_id: row.get(4)?,
            }));
        }
        Ok(None)
    }

    fn list_tasks(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, text, created_at
             FROM tasks
             WHERE project_id = ?1
             ORDER BY created_at DESC, id DESC;",
        )?;
        let mut rows = stmt.query([project_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update_task_text(&self, id: TaskId, text: &str) -> RepoResult<Task> {
        let mut stmt = self.conn.prepare(
            "UPDATE tasks SET text = ?2 WHERE id = ?1
             RETURNING id, project_id, text, created_at;",
        )?;
        let mut rows = stmt.query(params![id, text])?;
        if let Some(row) = rows.next()? {
            return Ok(parse_task_row(row)?);
        }
        Err(RepoError::NotFound { entity: "task", id })
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    fn count_tasks_for_owner(&self, owner_id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM tasks
             INNER JOIN projects ON projects.id = tasks.project_id
             WHERE projects.owner_id = ?1;",
            [owner_id],
            |row| row.get(0),
        )?;
        count_to_u64(count, "tasks")
    }
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
    })
}
