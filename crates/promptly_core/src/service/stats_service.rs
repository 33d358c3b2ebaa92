//! Home page counters.

use crate::model::user::User;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::suggestion_repo::SuggestionRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::ServiceResult;
use serde::Serialize;

/// Per-user entity counts. All zero for anonymous callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub project_count: u64,
    pub task_count: u64,
    pub ai_suggestions_count: u64,
}

pub struct StatsService<P, T, S> {
    projects: P,
    tasks: T,
    suggestions: S,
}

impl<P, T, S> StatsService<P, T, S>
where
    P: ProjectRepository,
    T: TaskRepository,
    S: SuggestionRepository,
{
    pub fn new(projects: P, tasks: T, suggestions: S) -> Self {
        Self {
            projects,
            tasks,
            suggestions,
        }
    }

    pub fn stats(&self, user: Option<&User>) -> ServiceResult<Stats> {
        let Some(user) = user else {
            return Ok(Stats::default());
        };
        Ok(Stats {
            project_count: self.projects.count_projects(user.id)?,
            task_count: self.tasks.count_tasks_for_owner(user.id)?,
            ai_suggestions_count: self.suggestions.count_suggestions(user.id)?,
        })
    }
}
