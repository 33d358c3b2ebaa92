//! Ollama `/api/chat` client.
//!
//! # Responsibility
//! - POST the conversation with `stream: true`.
//! - Decode the newline-delimited JSON reply one line at a time.
//!
//! # Invariants
//! - Requests block the calling thread; there is no client-side timeout.
//! - An `error` object anywhere in the stream ends it with `ChatError::Service`.

use crate::llm::client::{ChatChunk, ChatCompletion, ChatError, ChatResult, ChatStream};
use crate::model::chat::ChatMessage;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read};

/// Default local Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

const USER_AGENT: &str = concat!("promptly/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponseLine {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Blocking HTTP client for a local Ollama server.
pub struct OllamaClient {
    agent: ureq::Agent,
    base_url: String,
}

impl OllamaClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_URL)
    }
}

impl ChatCompletion for OllamaClient {
    fn stream_chat(&self, model: &str, messages: &[ChatMessage]) -> ChatResult<ChatStream> {
        let request = ChatRequest {
            model,
            messages,
            stream: true,
        };

        let response = match self.agent.post(&self.chat_url()).send_json(&request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(ChatError::Status {
                    code,
                    message: error_message_from_body(&body),
                });
            }
            Err(err) => return Err(ChatError::Transport(err.to_string())),
        };

        Ok(decode_stream(response.into_reader()))
    }
}

/// Lazily decodes an NDJSON chat reply.
///
/// Blank lines are skipped. Iteration stops after the first error.
pub fn decode_stream(reader: impl Read + Send + 'static) -> ChatStream {
    let mut failed = false;
    let lines = BufReader::new(reader).lines();
    Box::new(lines.filter_map(move |line| {
        if failed {
            return None;
        }
        let item = match line {
            Ok(line) if line.trim().is_empty() => return None,
            Ok(line) => decode_line(&line),
            Err(err) => Err(ChatError::Transport(err.to_string())),
        };
        failed = item.is_err();
        Some(item)
    }))
}

fn decode_line(line: &str) -> ChatResult<ChatChunk> {
    let parsed: ChatResponseLine =
        serde_json::from_str(line).map_err(|err| ChatError::Decode(err.to_string()))?;
    if let Some(error) = parsed.error {
        return Err(ChatError::Service(error));
    }
    Ok(ChatChunk {
        content: parsed.message.and_then(|message| message.content),
        done: parsed.done,
    })
}

fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "empty error response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
