//! Input validation for user-submitted text fields.
//!
//! # Responsibility
//! - Normalize raw form values into the exact text that gets persisted.
//! - Report every failing field, not just the first one.
//!
//! # Invariants
//! - Accepted values are always trimmed.
//! - Length limits count Unicode scalar values, not bytes.

use crate::model::project::PROJECT_TEXT_MAX_CHARS;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum username length.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Minimum password length at registration.
pub const PASSWORD_MIN_CHARS: usize = 8;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

const REQUIRED_MESSAGE: &str = "This field is required.";
const EMPTY_PROMPT_MESSAGE: &str = "Prompt is empty.";

/// One failing field and its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Non-empty list of field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates a list holding a single failure.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Appends every failure from `other`.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns whether any failure targets `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Groups messages by field name, in field order.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut grouped: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            grouped
                .entry(error.field)
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Validates a project label.
pub fn validate_project_text(raw: &str) -> ValidationResult<String> {
    let text = required_text("text", raw)?;
    let length = text.chars().count();
    if length > PROJECT_TEXT_MAX_CHARS {
        return Err(ValidationErrors::single(
            "text",
            format!(
                "Ensure this value has at most {PROJECT_TEXT_MAX_CHARS} characters (it has {length})."
            ),
        ));
    }
    Ok(text)
}

/// Validates a task body.
pub fn validate_task_text(raw: &str) -> ValidationResult<String> {
    required_text("text", raw)
}

/// Validates an edited suggestion body.
pub fn validate_suggestion_text(raw: &str) -> ValidationResult<String> {
    required_text("text", raw)
}

/// Validates a generation prompt.
pub fn validate_prompt(raw: &str) -> ValidationResult<String> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        return Err(ValidationErrors::single("prompt", EMPTY_PROMPT_MESSAGE));
    }
    Ok(prompt.to_string())
}

/// Validates a username for registration.
pub fn validate_username(raw: &str) -> ValidationResult<String> {
    let username = required_text("username", raw)?;
    let mut errors = ValidationErrors::default();

    let length = username.chars().count();
    if length > USERNAME_MAX_CHARS {
        errors.push(
            "username",
            format!("Ensure this value has at most {USERNAME_MAX_CHARS} characters (it has {length})."),
        );
    }
    if !USERNAME_RE.is_match(&username) {
        errors.push(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if errors.is_empty() {
        Ok(username)
    } else {
        Err(errors)
    }
}

/// Validates a new password. Passwords are never trimmed.
pub fn validate_password(raw: &str) -> ValidationResult<String> {
    if raw.is_empty() {
        return Err(ValidationErrors::single("password", REQUIRED_MESSAGE));
    }
    if raw.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationErrors::single(
            "password",
            format!(
                "This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."
            ),
        ));
    }
    Ok(raw.to_string())
}

fn required_text(field: &'static str, raw: &str) -> ValidationResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationErrors::single(field, REQUIRED_MESSAGE));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        validate_password, validate_project_text, validate_prompt, validate_task_text,
        validate_username, ValidationErrors,
    };

    #[test]
    fn project_text_is_trimmed_and_length_checked() {
        assert_eq!(validate_project_text("  Garden  ").unwrap(), "Garden");

        let err = validate_project_text(&"x".repeat(201)).unwrap_err();
        assert!(err.has_field("text"));
        assert!(err.to_string().contains("at most 200"));

        assert!(validate_project_text(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn blank_values_are_required_errors() {
        let err = validate_task_text(" \n\t ").unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].field, "text");

        let err = validate_prompt("   ").unwrap_err();
        assert_eq!(err.by_field()["prompt"], vec!["Prompt is empty.".to_string()]);
    }

    #[test]
    fn username_collects_every_failure() {
        let err = validate_username(&format!("{} bad", "a".repeat(150))).unwrap_err();
        assert_eq!(err.by_field()["username"].len(), 2);

        assert_eq!(validate_username(" ada.l+ov@e_-1 ").unwrap(), "ada.l+ov@e_-1");
    }

    #[test]
    fn password_is_kept_verbatim_and_length_checked() {
        assert_eq!(validate_password(" hunter2 ").unwrap(), " hunter2 ");
        assert!(validate_password("").unwrap_err().has_field("password"));

        let err = validate_password("short").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn display_joins_all_messages() {
        let mut errors = ValidationErrors::single("a", "first");
        errors.push("b", "second");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }
}
