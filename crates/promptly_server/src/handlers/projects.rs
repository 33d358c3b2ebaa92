//! Project handlers.
//!
//! # Responsibility
//! - List, show, create, edit and delete the caller's projects.
//!
//! # Invariants
//! - Successful create and edit answer `303 See Other`.
//! - A foreign project is 403 and an absent one is 404.

use super::{project_service, task_json, TextForm};
use crate::auth::{require_user, BearerToken};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::{Form, Json};
use promptly_core::ProjectId;
use serde_json::{json, Value};

/// `GET /projects/`
pub async fn list(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let projects = project_service(conn)?.list_projects(&user)?;
            Ok(Json(json!({ "projects": projects })))
        })
        .await
}

/// `GET /projects/{id}/`
pub async fn detail(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<ProjectId>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let detail = project_service(conn)?.project_detail(&user, id)?;
            let tasks: Vec<Value> = detail.tasks.iter().map(task_json).collect();
            Ok(Json(json!({ "project": detail.project, "tasks": tasks })))
        })
        .await
}

/// `GET /new_project/`
pub async fn new_form(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            require_user(conn, &token)?;
            Ok(Json(json!({ "form": { "text": "" } })))
        })
        .await
}

/// `POST /new_project/`
pub async fn create(
    State(state): State<AppState>,
    token: BearerToken,
    Form(form): Form<TextForm>,
) -> Result<Redirect, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            project_service(conn)?.create_project(&user, &form.text)?;
            Ok(Redirect::to("/projects/"))
        })
        .await
}

/// `GET /edit_project/{id}/`
pub async fn edit_form(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<ProjectId>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let project = project_service(conn)?.owned_project(&user, id)?;
            Ok(Json(json!({
                "form": { "text": project.text },
                "project": project,
            })))
        })
        .await
}

/// `POST /edit_project/{id}/`
pub async fn update(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<ProjectId>,
    Form(form): Form<TextForm>,
) -> Result<Redirect, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let project = project_service(conn)?.edit_project(&user, id, &form.text)?;
            Ok(Redirect::to(&format!("/projects/{}/", project.id)))
        })
        .await
}

/// `POST /delete_project/{id}/`
pub async fn delete(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            project_service(conn)?.delete_project(&user, id)?;
            Ok(StatusCode::NO_CONTENT)
        })
        .await
}
