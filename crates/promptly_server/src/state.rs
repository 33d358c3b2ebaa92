//! Shared handler state and the blocking-work bridge.

use crate::error::ApiError;
use promptly_core::{open_db, SuggestionGenerator};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    generator: SuggestionGenerator,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>, generator: SuggestionGenerator) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            generator,
        }
    }

    pub fn db_path(&self) -> &std::path::Path {
        self.db_path.as_path()
    }

    /// Runs `work` on the blocking pool with a fresh connection.
    ///
    /// SQLite calls and the chat-completion stream both block, so neither
    /// may run on the async executor.
    pub async fn run<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &SuggestionGenerator) -> Result<T, ApiError> + Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        let generator = self.generator.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_db(db_path.as_path())?;
            work(&conn, &generator)
        })
        .await
        .map_err(|err| ApiError::Worker(err.to_string()))?
    }
}
