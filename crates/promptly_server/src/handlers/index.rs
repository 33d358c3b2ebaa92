//! Landing page counts.
//!
//! Anonymous callers and unknown tokens see zeros.

use crate::auth::{optional_user, BearerToken};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use promptly_core::repo::project_repo::SqliteProjectRepository;
use promptly_core::repo::suggestion_repo::SqliteSuggestionRepository;
use promptly_core::repo::task_repo::SqliteTaskRepository;
use promptly_core::service::stats_service::{Stats, StatsService};

/// `GET /`: the caller's counts, or zeros without a valid token.
pub async fn stats(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Stats>, ApiError> {
    state
        .run(move |conn, _| {
            let user = optional_user(conn, &token)?;
            let service = StatsService::new(
                SqliteProjectRepository::try_new(conn)?,
                SqliteTaskRepository::try_new(conn)?,
                SqliteSuggestionRepository::try_new(conn)?,
            );
            Ok(Json(service.stats(user.as_ref())?))
        })
        .await
}
