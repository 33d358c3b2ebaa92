//! AI suggestion handlers.
//!
//! # Responsibility
//! - Generate and store suggestions, and list, edit and delete them.
//!
//! # Invariants
//! - Generation blocks its worker until the model reply is complete.
//! - Suggestions outside the caller's scope are 404.

use super::{parse_optional_id, suggestion_json, suggestion_service, TextForm};
use crate::auth::{require_user, BearerToken};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::{Form, Json};
use promptly_core::service::suggestion_service::SuggestionFilter;
use promptly_core::SuggestionId;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

/// `POST /generate-ai/`: blocks until the model reply is complete.
pub async fn generate(
    State(state): State<AppState>,
    token: BearerToken,
    Form(form): Form<GenerateForm>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, generator| {
            let user = require_user(conn, &token)?;
            let project_id = parse_optional_id("project_id", form.project_id.as_deref())?;
            let stored = suggestion_service(conn)?.generate_suggestion(
                &user,
                &form.prompt,
                project_id,
                generator,
            )?;
            Ok(Json(json!({ "suggestion": stored.text })))
        })
        .await
}

/// `GET /ai_suggestions/?q=&project=`
pub async fn list(
    State(state): State<AppState>,
    token: BearerToken,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let filter = SuggestionFilter {
                query: params.q,
                project_id: parse_optional_id("project", params.project.as_deref())?,
            };
            let listing = suggestion_service(conn)?.list_suggestions(&user, &filter)?;
            let suggestions: Vec<Value> = listing.suggestions.iter().map(suggestion_json).collect();
            Ok(Json(json!({
                "suggestions": suggestions,
                "projects": listing.projects,
                "query": listing.query,
                "selected_project": listing.selected_project,
            })))
        })
        .await
}

/// `GET /ai_suggestions/edit/{id}/`
pub async fn edit_form(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<SuggestionId>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let suggestion = suggestion_service(conn)?.suggestion_for_edit(&user, id)?;
            Ok(Json(json!({
                "form": { "text": suggestion.text },
                "suggestion": suggestion_json(&suggestion),
            })))
        })
        .await
}

/// `POST /ai_suggestions/edit/{id}/`
pub async fn update(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<SuggestionId>,
    Form(form): Form<TextForm>,
) -> Result<Redirect, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            suggestion_service(conn)?.edit_suggestion(&user, id, &form.text)?;
            Ok(Redirect::to("/ai_suggestions/"))
        })
        .await
}

/// `POST /ai_suggestions/delete/{id}/`
pub async fn delete(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<SuggestionId>,
) -> Result<StatusCode, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            suggestion_service(conn)?.delete_suggestion(&user, id)?;
            Ok(StatusCode::NO_CONTENT)
        })
        .await
}
