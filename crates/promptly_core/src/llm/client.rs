//! Streaming chat-completion contract.
//!
//! # Invariants
//! - Chunks are yielded in arrival order.
//! - A chunk with `content: None` carries no text, not an error.

use crate::model::chat::ChatMessage;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ChatResult<T> = Result<T, ChatError>;

/// Incremental response fragments, consumed lazily.
pub type ChatStream = Box<dyn Iterator<Item = ChatResult<ChatChunk>> + Send>;

/// One streamed fragment of assistant output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatChunk {
    pub content: Option<String>,
    /// Set on the final fragment.
    pub done: bool,
}

impl ChatChunk {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            done: false,
        }
    }
}

/// Failure raised by a chat-completion backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Connection, DNS, TLS or read failure.
    Transport(String),
    /// Backend answered with a non-success status.
    Status { code: u16, message: String },
    /// Backend reported an error inside the stream.
    Service(String),
    /// A streamed line could not be decoded.
    Decode(String),
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "{message}"),
            Self::Status { code, message } => write!(f, "{message} (status code: {code})"),
            Self::Service(message) => write!(f, "{message}"),
            Self::Decode(message) => write!(f, "malformed response: {message}"),
        }
    }
}

impl Error for ChatError {}

/// Chat-completion backend able to stream a reply.
pub trait ChatCompletion: Send + Sync {
    /// Submits the ordered conversation and returns the reply stream.
    fn stream_chat(&self, model: &str, messages: &[ChatMessage]) -> ChatResult<ChatStream>;
}
