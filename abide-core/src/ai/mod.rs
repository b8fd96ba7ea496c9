//! AI text generation: actions, envelopes, response parsing and the Gemini
//! client.

mod action;
mod gemini;
mod parse;
mod service;

pub use action::{AiAction, AiOutput, AiRequest, AiResponse, Card, Reading};
pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use parse::{parse_response, AiResult};
pub use service::{AiService, ResponseFormat, TextGenerator, UNAVAILABLE_MESSAGE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Missing action or payload")]
    MissingField,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("AI request failed: {0}")]
    Request(String),
    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("AI returned an empty response")]
    EmptyResponse,
}

impl AiError {
    /// True for errors caused by the request rather than the generator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AiError::MissingField | AiError::UnknownAction(_) | AiError::InvalidInput(_)
        )
    }
}
