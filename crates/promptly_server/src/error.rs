//! HTTP error mapping.
//!
//! # Invariants
//! - Storage and worker failures answer 500 with a fixed body; details only
//!   reach the log.
//! - Validation failures answer 400 with every failing field.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use promptly_core::{DbError, RepoError, ServiceError};
use serde_json::json;
use std::fmt::{Display, Formatter};

pub const INVALID_METHOD_MESSAGE: &str = "Invalid request method.";

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// Route exists but only accepts POST.
    InvalidMethod,
    /// Blocking worker panicked or was cancelled.
    Worker(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::InvalidMethod => write!(f, "{INVALID_METHOD_MESSAGE}"),
            Self::Worker(message) => write!(f, "request worker failed: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Service(RepoError::Db(value).into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            Self::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(ServiceError::Repo(_)) | Self::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidMethod => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Service(ServiceError::Validation(errors)) => {
                (status, Json(json!({ "errors": errors.by_field() }))).into_response()
            }
            Self::Service(ServiceError::Unauthenticated) => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "error": "Authentication required." })),
            )
                .into_response(),
            err if status.is_server_error() => {
                error!(
                    "event=http_error module=server status=error code={} error={}",
                    status.as_u16(),
                    err
                );
                (status, Json(json!({ "error": "Internal server error." }))).into_response()
            }
            err => (status, Json(json!({ "error": err.to_string() }))).into_response(),
        }
    }
}
