//! Task handlers.
//!
//! # Responsibility
//! - Create, edit and delete tasks under the caller's projects.
//!
//! # Invariants
//! - Task access follows the owner of the parent project.
//! - Successful create and edit redirect to the parent project page.

use super::{task_json, task_service, TextForm};
use crate::auth::{require_user, BearerToken};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::{Form, Json};
use promptly_core::{ProjectId, TaskId};
use serde_json::{json, Value};

/// `GET /new_task/{project_id}/`
pub async fn new_form(
    State(state): State<AppState>,
    token: BearerToken,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let project = task_service(conn)?.task_parent(&user, project_id)?;
            Ok(Json(json!({ "project": project, "form": { "text": "" } })))
        })
        .await
}

/// `POST /new_task/{project_id}/`
pub async fn create(
    State(state): State<AppState>,
    token: BearerToken,
    Path(project_id): Path<ProjectId>,
    Form(form): Form<TextForm>,
) -> Result<Redirect, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            task_service(conn)?.create_task(&user, project_id, &form.text)?;
            Ok(Redirect::to(&format!("/projects/{project_id}/")))
        })
        .await
}

/// `GET /edit_task/{id}/`
pub async fn edit_form(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<TaskId>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let edit = task_service(conn)?.task_for_edit(&user, id)?;
            Ok(Json(json!({
                "form": { "text": edit.task.text },
                "task": task_json(&edit.task),
                "project": edit.project,
            })))
        })
        .await
}

/// `POST /edit_task/{id}/`
pub async fn update(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<TaskId>,
    Form(form): Form<TextForm>,
) -> Result<Redirect, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            let task = task_service(conn)?.edit_task(&user, id, &form.text)?;
            Ok(Redirect::to(&format!("/projects/{}/", task.project_id)))
        })
        .await
}

/// `POST /delete_task/{id}/`
pub async fn delete(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    state
        .run(move |conn, _| {
            let user = require_user(conn, &token)?;
            task_service(conn)?.delete_task(&user, id)?;
            Ok(StatusCode::NO_CONTENT)
        })
        .await
}
