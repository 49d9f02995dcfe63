//! Core error type

use thiserror::Error;

/// Errors raised by core types and collaborator ports
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Doctor directory error: {0}")]
    Directory(String),

    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
