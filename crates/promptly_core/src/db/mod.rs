//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open Promptly connections with foreign keys and a busy timeout.
//! - Bring the file to the latest schema before any repository sees it.
//!
//! # Schema
//! - `users` (case-insensitive unique `username`, password salt and digest)
//!   own `user_tokens`, `projects` and `ai_suggestions`.
//! - `tasks` hang off `projects`; `ai_suggestions` optionally reference a
//!   project and a task.
//!
//! # Invariants
//! - Deleting a user removes their tokens, projects and suggestions.
//! - Deleting a project removes its tasks and every suggestion attached to
//!   it; deleting a task removes suggestions attached to that task.
//! - Migration version is mirrored in `PRAGMA user_version`; a file newer
//!   than this binary is refused with [`DbError::UnsupportedSchemaVersion`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
