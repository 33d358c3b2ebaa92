//! Ownership rule set.
//!
//! # Invariants
//! - Projects are accessible only to `project.owner_id`.
//! - Tasks are accessible only to the owner of their parent project.
//! - Absent entities yield `NotFound`; foreign entities yield `Forbidden`.
//! - Suggestions never pass through here: their lookups are owner-scoped,
//!   so a foreign suggestion is already `NotFound`.

use crate::model::project::{Project, ProjectId};
use crate::model::task::{OwnedTask, TaskId};
use crate::model::user::User;
use crate::service::{ServiceError, ServiceResult};
use log::warn;

/// Authorizes `user` against a looked-up project.
pub fn authorize_project(
    project: Option<Project>,
    id: ProjectId,
    user: &User,
) -> ServiceResult<Project> {
    match project {
        None => Err(ServiceError::NotFound {
            entity: "project",
            id,
        }),
        Some(project) if !project.is_owned_by(user.id) => {
            warn!(
                "event=access_denied module=service entity=project id={} user_id={}",
                id, user.id
            );
            Err(ServiceError::Forbidden {
                entity: "project",
                id,
            })
        }
        Some(project) => Ok(project),
    }
}

/// Authorizes `user` against a looked-up task through its parent project.
pub fn authorize_task(task: Option<OwnedTask>, id: TaskId, user: &User) -> ServiceResult<OwnedTask> {
    match task {
        None => Err(ServiceError::NotFound { entity: "task", id }),
        Some(task) if !task.is_owned_by(user.id) => {
            warn!(
                "event=access_denied module=service entity=task id={} user_id={}",
                id, user.id
            );
            Err(ServiceError::Forbidden { entity: "task", id })
        }
        Some(task) => Ok(task),
    }
}
