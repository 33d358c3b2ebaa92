//! Chat-completion plumbing and the suggestion generator.
//!
//! # Responsibility
//! - Define the streaming chat-completion contract used by the generator.
//! - Provide the Ollama HTTP implementation of that contract.
//! - Turn prompts into assistant text that never surfaces as an error.

pub mod client;
pub mod generator;
pub mod ollama;
