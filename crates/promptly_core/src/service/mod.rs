//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Apply the ownership rule set before any read or write.
//! - Keep the HTTP layer decoupled from storage details.

use crate::model::validation::ValidationErrors;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod access;
pub mod account_service;
pub mod project_service;
pub mod stats_service;
pub mod suggestion_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error taxonomy shared by every use case.
#[derive(Debug)]
pub enum ServiceError {
    /// Entity is truly absent, or hidden by an owner-scoped lookup.
    NotFound { entity: &'static str, id: i64 },
    /// Entity exists but belongs to another user.
    Forbidden { entity: &'static str, id: i64 },
    /// Submitted input failed field validation.
    Validation(ValidationErrors),
    /// No valid identity was presented.
    Unauthenticated,
    /// Write collided with an existing unique value.
    Conflict(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Forbidden { entity, id } => {
                write!(f, "{entity} {id} belongs to another user")
            }
            Self::Validation(errors) => write!(f, "invalid input: {errors}"),
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}
