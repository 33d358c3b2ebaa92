//! Suggestion generator.
//!
//! # Responsibility
//! - Frame a prompt with the fixed system instruction and optional history.
//! - Accumulate the streamed reply into one string.
//!
//! # Invariants
//! - `generate` always returns text. Backend failures become
//!   `"Error generating AI suggestion: <message>"`.
//! - Text accumulated before a failure is discarded, never returned.

use crate::llm::client::{ChatCompletion, ChatResult};
use crate::model::chat::ChatMessage;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Default Ollama model tag.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Prefix of the text returned in place of a reply when generation fails.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating AI suggestion: ";

/// Fixed system instruction sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "\
You are a productivity assistant. You help users create detailed tasks and \
steps to complete their projects. The user will provide you with a project or \
topic that requires steps and tasks to complete. Give them a detailed list of \
tasks to complete their project. The user may also ask you general questions. \
Give them accurate and truthful answers only. If you don't know the answer, \
tell them and offer best help suggestions.

Rules:
- Always respond accurately.
- Offer suggestions that will improve productivity.
- Prioritize accuracy and productivity.
- Keep your responses short if they take too long to process.
- Value providing answers promptly.
- Organize tasks logically and break complex projects into manageable steps.
- Use clear and actionable language.
- Provide optional tips or shortcuts where relevant.
- Ask clarifying questions if the user's request is ambiguous.

Example:
User: How do I organize my time to complete project A, B, and C?
System:
1. List all tasks for each project and estimate time required.
2. Prioritize tasks based on deadlines and importance.
3. Allocate time blocks in your calendar for each task.
4. Set reminders and checkpoints to track progress.
5. Review and adjust the plan weekly.
Tips: Use the Pomodoro technique for focused work sessions and batch similar \
tasks together to save time.
";

/// Produces assistant text for user prompts.
#[derive(Clone)]
pub struct SuggestionGenerator {
    client: Arc<dyn ChatCompletion>,
    model: String,
    system_prompt: String,
}

impl SuggestionGenerator {
    /// Creates a generator using [`SYSTEM_PROMPT`].
    pub fn new(client: Arc<dyn ChatCompletion>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replaces the system instruction.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a reply to `prompt`, optionally continuing `history`.
    ///
    /// Blocks until the whole stream is consumed.
    pub fn generate(&self, prompt: &str, history: Option<&[ChatMessage]>) -> String {
        let started_at = Instant::now();
        let messages = build_messages(&self.system_prompt, history, prompt);

        match self.collect_reply(&messages) {
            Ok(reply) => {
                info!(
                    "event=suggestion_generate module=llm status=ok model={} turns={} duration_ms={} chars={}",
                    self.model,
                    messages.len(),
                    started_at.elapsed().as_millis(),
                    reply.chars().count()
                );
                reply
            }
            Err(err) => {
                warn!(
                    "event=suggestion_generate module=llm status=error model={} duration_ms={} error={}",
                    self.model,
                    started_at.elapsed().as_millis(),
                    err
                );
                format!("{GENERATION_ERROR_PREFIX}{err}")
            }
        }
    }

    fn collect_reply(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let stream = self.client.stream_chat(&self.model, messages)?;
        let mut reply = String::new();
        for chunk in stream {
            if let Some(content) = chunk?.content {
                reply.push_str(&content);
            }
        }
        Ok(reply)
    }
}

/// Builds the ordered conversation: system turn, history, then the prompt.
pub fn build_messages(
    system_prompt: &str,
    history: Option<&[ChatMessage]>,
    prompt: &str,
) -> Vec<ChatMessage> {
    let history = history.unwrap_or_default();
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(prompt));
    messages
}
