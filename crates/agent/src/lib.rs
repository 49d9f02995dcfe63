//! Conversation layer of the booking assistant
//!
//! Features:
//! - Intent resolution (external AI with rule-cascade fallback)
//! - Multi-turn slot filling backed by per-session context
//! - Doctor search, availability and profiles from a file-backed directory
//! - Session storage with idle expiry

pub mod classifier;
pub mod directory;
pub mod orchestrator;
pub mod responses;
pub mod session;

pub use classifier::{ClassificationResult, IntentResolver};
pub use directory::InMemoryDoctorDirectory;
pub use orchestrator::{resolve_continuation, ChatReply, Orchestrator, OrchestratorConfig};
pub use session::{spawn_sweeper, InMemorySessionStore};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<medassist_core::Error> for AgentError {
    fn from(err: medassist_core::Error) -> Self {
        use medassist_core::Error;
        match err {
            Error::SessionStore(msg) => AgentError::Session(msg),
            Error::Directory(msg) => AgentError::Directory(msg),
            other => AgentError::Internal(other.to_string()),
        }
    }
}

impl From<medassist_config::ConfigError> for AgentError {
    fn from(err: medassist_config::ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_kind() {
        let err = AgentError::from(medassist_core::Error::SessionStore("poisoned".to_string()));
        assert!(matches!(err, AgentError::Session(ref msg) if msg == "poisoned"));

        let err = AgentError::from(medassist_core::Error::Directory("missing".to_string()));
        assert!(matches!(err, AgentError::Directory(_)));
    }
}
