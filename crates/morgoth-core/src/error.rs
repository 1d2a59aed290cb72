//! Shared error type across morgoth crates.

use thiserror::Error;

/// Stable error codes, used by tooling and tests instead of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Pattern source could not be compiled.
    InvalidPattern,
    /// Two supervisors declare the same pattern.
    DuplicatePattern,
    /// Malformed or out-of-range configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Output sink failure.
    Sink,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::DuplicatePattern => "DUPLICATE_PATTERN",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Sink => "SINK",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MorgothError>;

/// Unified error type used by core and dispatch.
#[derive(Debug, Error)]
pub enum MorgothError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("duplicate pattern: {0}")]
    DuplicatePattern(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("sink: {0}")]
    Sink(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MorgothError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MorgothError::InvalidPattern(_) => ErrorKind::InvalidPattern,
            MorgothError::DuplicatePattern(_) => ErrorKind::DuplicatePattern,
            MorgothError::BadConfig(_) => ErrorKind::BadConfig,
            MorgothError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            MorgothError::Sink(_) => ErrorKind::Sink,
            MorgothError::Internal(_) => ErrorKind::Internal,
        }
    }
}
