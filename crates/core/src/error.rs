//! Error types for the Stoa domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Tier failures (`SelectError`) are always absorbed by the orchestrator;
//! only configuration-class errors reach the caller of `select`.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Stoa operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Tier errors ---
    #[error("Selection error: {0}")]
    Select(#[from] SelectError),

    // --- Corpus errors ---
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Caller-initiated ---
    #[error("Selection cancelled")]
    Cancelled,

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error should stop the process at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Corpus(_))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure of one remote selection tier (retrieval or provider).
///
/// Every variant makes the orchestrator mark the tier unavailable for the
/// rest of the session and move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl SelectError {
    /// Short label used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::RateLimited { .. } => "rate_limited",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse corpus: {0}")]
    Parse(String),

    #[error("Corpus is empty")]
    Empty,

    #[error("Duplicate item id in corpus: {0}")]
    DuplicateId(String),

    #[error("Invalid item at position {index}: {reason}")]
    InvalidItem { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_error_displays_correctly() {
        let err = Error::Select(SelectError::RateLimited {
            retry_after_secs: 30,
        });
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("Rate limited"));
    }

    #[test]
    fn corpus_error_displays_correctly() {
        let err = Error::Corpus(CorpusError::DuplicateId("seneca-1".into()));
        assert!(err.to_string().contains("seneca-1"));
    }

    #[test]
    fn fatal_classification() {
        assert!(Error::config("no key").is_fatal());
        assert!(Error::Corpus(CorpusError::Empty).is_fatal());
        assert!(!Error::Cancelled.is_fatal());
        assert!(!Error::Select(SelectError::Transport("reset".into())).is_fatal());
    }

    #[test]
    fn select_error_kinds() {
        assert_eq!(SelectError::Auth("x".into()).kind(), "auth");
        assert_eq!(
            SelectError::MalformedResponse("x".into()).kind(),
            "malformed_response"
        );
        assert_eq!(SelectError::Unavailable("x".into()).kind(), "unavailable");
    }
}
