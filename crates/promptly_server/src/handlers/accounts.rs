//! Account handlers.
//!
//! # Responsibility
//! - Register accounts, exchange a username/password pair for a token and
//!   revoke tokens.
//!
//! # Invariants
//! - Register and login are the only token-issuing routes and need no token.
//! - Logout revokes only the presented token; the password keeps working.

use crate::auth::{account_service, BearerToken};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use promptly_core::service::account_service::IssuedToken;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn issued_json(issued: IssuedToken) -> Json<Value> {
    Json(json!({ "user": issued.user, "token": issued.token }))
}

/// `POST /accounts/register/`: creates a user and returns its first token.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .run(move |conn, _| {
            let issued = account_service(conn)?.register(&form.username, &form.password)?;
            Ok((StatusCode::CREATED, issued_json(issued)))
        })
        .await
}

/// `POST /accounts/login/`: verifies credentials and returns a new token.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(move |conn, _| {
            let issued = account_service(conn)?.login(&form.username, &form.password)?;
            Ok(issued_json(issued))
        })
        .await
}

/// `POST /accounts/logout/`: revokes the presented token.
pub async fn logout(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<StatusCode, ApiError> {
    state
        .run(move |conn, _| {
            let token = token.as_deref().unwrap_or_default();
            account_service(conn)?.revoke(token)?;
            Ok(StatusCode::NO_CONTENT)
        })
        .await
}
