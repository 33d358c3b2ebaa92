//! Task use-case service.
//!
//! # Invariants
//! - Every operation is authorized through the parent project's owner.

use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId};
use crate::model::user::User;
use crate::model::validation::validate_task_text;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::access::{authorize_project, authorize_task};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use serde::Serialize;

/// Edit form payload: the task plus the project it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEdit {
    pub task: Task,
    pub project: Project,
}

/// Task service facade over repository implementations.
pub struct TaskService<P: ProjectRepository, T: TaskRepository> {
    projects: P,
    tasks: T,
}

impl<P: ProjectRepository, T: TaskRepository> TaskService<P, T> {
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    /// Loads the owned project a new task would be added to.
    pub fn task_parent(&self, user: &User, project_id: ProjectId) -> ServiceResult<Project> {
        authorize_project(self.projects.get_project(project_id)?, project_id, user)
    }

    /// Creates a task under an owned project.
    pub fn create_task(
        &self,
        user: &User,
        project_id: ProjectId,
        raw_text: &str,
    ) -> ServiceResult<Task> {
        let project = self.task_parent(user, project_id)?;
        let text = validate_task_text(raw_text)?;
        let task = self.tasks.create_task(project.id, &text)?;
        info!(
            "event=task_create module=service status=ok task_id={} project_id={}",
            task.id, project.id
        );
        Ok(task)
    }

    /// Loads an owned task with its project to pre-fill an edit form.
    pub fn task_for_edit(&self, user: &User, id: TaskId) -> ServiceResult<TaskEdit> {
        let owned = authorize_task(self.tasks.get_task(id)?, id, user)?;
        let project_id = owned.task.project_id;
        let project =
            self.projects
                .get_project(project_id)?
                .ok_or(ServiceError::NotFound {
                    entity: "project",
                    id: project_id,
                })?;
        Ok(TaskEdit {
            task: owned.task,
            project,
        })
    }

    /// Replaces an owned task's body.
    pub fn edit_task(&self, user: &User, id: TaskId, raw_text: &str) -> ServiceResult<Task> {
        let owned = authorize_task(self.tasks.get_task(id)?, id, user)?;
        let text = validate_task_text(raw_text)?;
        Ok(self.tasks.update_task_text(owned.task.id, &text)?)
    }

    /// Deletes an owned task. Deleting twice yields `NotFound`.
    pub fn delete_task(&self, user: &User, id: TaskId) -> ServiceResult<()> {
        let owned = authorize_task(self.tasks.get_task(id)?, id, user)?;
        self.tasks.delete_task(owned.task.id)?;
        info!(
            "event=task_delete module=service status=ok task_id={} project_id={}",
            owned.task.id, owned.task.project_id
        );
        Ok(())
    }
}
