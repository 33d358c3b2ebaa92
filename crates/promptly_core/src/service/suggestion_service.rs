//! AI suggestion use-case service.
//!
//! # Responsibility
//! - Validate the prompt, resolve the optional target project, run the
//!   generator and persist its output.
//! - Owner-scoped listing, editing and deletion of stored suggestions.
//!
//! # Invariants
//! - A blank prompt is rejected before the generator runs and before any
//!   row is written.
//! - The target project is resolved with an owner-scoped lookup: absent and
//!   foreign projects are both `NotFound`.
//! - Generation never fails from this service's point of view; an inline
//!   error string is persisted like any other reply.
//! - Generated suggestions are never attached to a task.

use crate::llm::generator::SuggestionGenerator;
use crate::model::project::{Project, ProjectId};
use crate::model::suggestion::{AiSuggestion, NewSuggestion, SuggestionId};
use crate::model::user::User;
use crate::model::validation::{validate_prompt, validate_suggestion_text};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::suggestion_repo::{SuggestionListQuery, SuggestionRepository};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use serde::Serialize;

/// List filters accepted from the suggestions page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionFilter {
    /// Case-insensitive substring filter.
    pub query: Option<String>,
    /// Exact project filter.
    pub project_id: Option<ProjectId>,
}

/// Suggestions page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionListing {
    /// Newest first.
    pub suggestions: Vec<AiSuggestion>,
    /// Caller's projects, for the project filter.
    pub projects: Vec<Project>,
    pub query: String,
    pub selected_project: Option<ProjectId>,
}

/// Suggestion service facade over repository implementations.
pub struct SuggestionService<S: SuggestionRepository, P: ProjectRepository> {
    suggestions: S,
    projects: P,
}

impl<S: SuggestionRepository, P: ProjectRepository> SuggestionService<S, P> {
    pub fn new(suggestions: S, projects: P) -> Self {
        Self {
            suggestions,
            projects,
        }
    }

    /// Resolves an optional target project owned by `user`.
    pub fn resolve_project(
        &self,
        user: &User,
        project_id: Option<ProjectId>,
    ) -> ServiceResult<Option<Project>> {
        let Some(id) = project_id else {
            return Ok(None);
        };
        match self.projects.get_project(id)? {
            Some(project) if project.is_owned_by(user.id) => Ok(Some(project)),
            _ => Err(ServiceError::NotFound {
                entity: "project",
                id,
            }),
        }
    }

    /// Runs the generator for `raw_prompt` and stores the reply.
    ///
    /// Blocks for the full duration of the chat-completion call.
    pub fn generate_suggestion(
        &self,
        user: &User,
        raw_prompt: &str,
        project_id: Option<ProjectId>,
        generator: &SuggestionGenerator,
    ) -> ServiceResult<AiSuggestion> {
        let prompt = validate_prompt(raw_prompt)?;
        let project = self.resolve_project(user, project_id)?;
        let text = generator.generate(&prompt, None);
        self.record_suggestion(user, project.map(|project| project.id), text)
    }

    /// Persists generated text as a new suggestion owned by `user`.
    pub fn record_suggestion(
        &self,
        user: &User,
        project_id: Option<ProjectId>,
        text: String,
    ) -> ServiceResult<AiSuggestion> {
        let suggestion = self.suggestions.create_suggestion(&NewSuggestion {
            owner_id: user.id,
            project_id,
            task_id: None,
            text,
        })?;
        info!(
            "event=suggestion_create module=service status=ok suggestion_id={} owner_id={} project_id={}",
            suggestion.id,
            user.id,
            project_id.map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        Ok(suggestion)
    }

    /// Lists the caller's suggestions with optional filters.
    pub fn list_suggestions(
        &self,
        user: &User,
        filter: &SuggestionFilter,
    ) -> ServiceResult<SuggestionListing> {
        let query = filter
            .query
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let suggestions = self.suggestions.list_suggestions(&SuggestionListQuery {
            owner_id: user.id,
            text_contains: Some(query.clone()).filter(|value| !value.is_empty()),
            project_id: filter.project_id,
        })?;
        let projects = self.projects.list_projects(user.id)?;
        Ok(SuggestionListing {
            suggestions,
            projects,
            query,
            selected_project: filter.project_id,
        })
    }

    /// Loads one of the caller's suggestions to pre-fill an edit form.
    pub fn suggestion_for_edit(&self, user: &User, id: SuggestionId) -> ServiceResult<AiSuggestion> {
        self.suggestions
            .get_suggestion(id, user.id)?
            .ok_or(ServiceError::NotFound {
                entity: "suggestion",
                id,
            })
    }

    /// Replaces the body of one of the caller's suggestions.
    pub fn edit_suggestion(
        &self,
        user: &User,
        id: SuggestionId,
        raw_text: &str,
    ) -> ServiceResult<AiSuggestion> {
        let suggestion = self.suggestion_for_edit(user, id)?;
        let text = validate_suggestion_text(raw_text)?;
        Ok(self
            .suggestions
            .update_suggestion_text(suggestion.id, user.id, &text)?)
    }

    /// Deletes one of the caller's suggestions.
    pub fn delete_suggestion(&self, user: &User, id: SuggestionId) -> ServiceResult<()> {
        self.suggestions.delete_suggestion(id, user.id)?;
        info!(
            "event=suggestion_delete module=service status=ok suggestion_id={} owner_id={}",
            id, user.id
        );
        Ok(())
    }
}
