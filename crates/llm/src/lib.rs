//! External AI integration for the booking assistant
//!
//! Features:
//! - Chat backends for OpenAI-compatible APIs and Ollama
//! - Closed-set intent classification with JSON replies
//! - Free-form replies grounded in recent conversation history
//! - Bounded single-attempt calls; callers fall back on any error

pub mod assistant;
pub mod backend;
pub mod factory;
pub mod prompt;

pub use assistant::{parse_classification, ExternalAi, LlmAssistant};
pub use backend::{FinishReason, GenerationResult, LlmBackend, LlmConfig, OllamaBackend, OpenAIBackend};
pub use factory::{create_assistant, create_backend};
pub use prompt::{Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
