//! Project use-case service.
//!
//! # Invariants
//! - Ownership is checked before validation and before any write.
//! - Project detail lists tasks newest-first.

use crate::model::project::{Project, ProjectId};
use crate::model::task::Task;
use crate::model::user::User;
use crate::model::validation::validate_project_text;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::access::authorize_project;
use crate::service::ServiceResult;
use log::info;
use serde::Serialize;

/// Project page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    /// Newest first.
    pub tasks: Vec<Task>,
}

/// Project service facade over repository implementations.
pub struct ProjectService<P: ProjectRepository, T: TaskRepository> {
    projects: P,
    tasks: T,
}

impl<P: ProjectRepository, T: TaskRepository> ProjectService<P, T> {
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    /// Lists the caller's projects, oldest first.
    pub fn list_projects(&self, user: &User) -> ServiceResult<Vec<Project>> {
        Ok(self.projects.list_projects(user.id)?)
    }

    /// Loads one owned project with its tasks.
    pub fn project_detail(&self, user: &User, id: ProjectId) -> ServiceResult<ProjectDetail> {
        let project = self.owned_project(user, id)?;
        let tasks = self.tasks.list_tasks(project.id)?;
        Ok(ProjectDetail { project, tasks })
    }

    /// Creates a project owned by `user`.
    pub fn create_project(&self, user: &User, raw_text: &str) -> ServiceResult<Project> {
        let text = validate_project_text(raw_text)?;
        let project = self.projects.create_project(user.id, &text)?;
        info!(
            "event=project_create module=service status=ok project_id={} owner_id={}",
            project.id, user.id
        );
        Ok(project)
    }

    /// Loads one owned project to pre-fill an edit form.
    pub fn owned_project(&self, user: &User, id: ProjectId) -> ServiceResult<Project> {
        authorize_project(self.projects.get_project(id)?, id, user)
    }

    /// Replaces an owned project's label.
    pub fn edit_project(
        &self,
        user: &User,
        id: ProjectId,
        raw_text: &str,
    ) -> ServiceResult<Project> {
        let project = self.owned_project(user, id)?;
        let text = validate_project_text(raw_text)?;
        Ok(self.projects.update_project_text(project.id, &text)?)
    }

    /// Deletes an owned project together with its tasks and suggestions.
    pub fn delete_project(&self, user: &User, id: ProjectId) -> ServiceResult<()> {
        let project = self.owned_project(user, id)?;
        self.projects.delete_project(project.id)?;
        info!(
            "event=project_delete module=service status=ok project_id={} owner_id={}",
            project.id, user.id
        );
        Ok(())
    }
}
