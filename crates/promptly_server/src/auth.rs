//! Bearer-token request authentication.
//!
//! # Responsibility
//! - Extract the presented bearer token without ever rejecting.
//! - Guard protected routes with [`require_token`] ahead of every other
//!   extractor.
//! - Resolve the caller inside handlers via [`require_user`].
//!
//! # Invariants
//! - A protected route answers 401 to a missing or unknown token before its
//!   path or body is parsed.

use crate::error::ApiError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use promptly_core::repo::user_repo::SqliteUserRepository;
use promptly_core::service::account_service::AccountService;
use promptly_core::{ServiceError, User};
use rusqlite::Connection;
use std::convert::Infallible;

/// Token presented in `Authorization: Bearer <token>`, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer);
        Ok(Self(token))
    }
}

fn parse_bearer(header: &str) -> Option<String> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

pub(crate) fn account_service(
    conn: &Connection,
) -> Result<AccountService<SqliteUserRepository<'_>>, ApiError> {
    Ok(AccountService::new(SqliteUserRepository::try_new(conn)?))
}

/// Route layer that rejects unauthenticated requests.
pub async fn require_token(
    State(state): State<AppState>,
    token: BearerToken,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state
        .run(move |conn, _| require_user(conn, &token).map(|_| ()))
        .await?;
    Ok(next.run(request).await)
}

/// Resolves the caller or fails with `Unauthenticated`.
pub fn require_user(conn: &Connection, token: &BearerToken) -> Result<User, ApiError> {
    let token = token.as_deref().ok_or(ServiceError::Unauthenticated)?;
    Ok(account_service(conn)?.authenticate(token)?)
}

/// Resolves the caller when a valid token is presented.
pub fn optional_user(conn: &Connection, token: &BearerToken) -> Result<Option<User>, ApiError> {
    match require_user(conn, token) {
        Ok(user) => Ok(Some(user)),
        Err(ApiError::Service(ServiceError::Unauthenticated)) => Ok(None),
        Err(err) => Err(err),
    }
}
