//! HTTP surface for Promptly.
//!
//! # Responsibility
//! - Map routes onto `promptly_core` services.
//! - Authenticate bearer tokens and translate service errors to statuses.
//!
//! # Invariants
//! - Only `/`, `/accounts/register/` and `/accounts/login/` are reachable
//!   without a token.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use handlers::{accounts, index, invalid_method, projects, suggestions, tasks};

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/accounts/logout/", post(accounts::logout))
        .route("/projects/", get(projects::list))
        .route("/projects/:id/", get(projects::detail))
        .route(
            "/new_project/",
            get(projects::new_form).post(projects::create),
        )
        .route(
            "/edit_project/:id/",
            get(projects::edit_form).post(projects::update),
        )
        .route(
            "/delete_project/:id/",
            post(projects::delete).fallback(invalid_method),
        )
        .route(
            "/new_task/:project_id/",
            get(tasks::new_form).post(tasks::create),
        )
        .route("/edit_task/:id/", get(tasks::edit_form).post(tasks::update))
        .route(
            "/delete_task/:id/",
            post(tasks::delete).fallback(invalid_method),
        )
        .route(
            "/generate-ai/",
            post(suggestions::generate).fallback(invalid_method),
        )
        .route("/ai_suggestions/", get(suggestions::list))
        .route(
            "/ai_suggestions/edit/:id/",
            get(suggestions::edit_form).post(suggestions::update),
        )
        .route(
            "/ai_suggestions/delete/:id/",
            post(suggestions::delete).fallback(invalid_method),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/", get(index::stats))
        .route("/accounts/register/", post(accounts::register))
        .route("/accounts/login/", post(accounts::login))
        .merge(protected)
        .with_state(state)
}
