//! Error types module
//!
//! This module provides the error metadata contract shared by every thumbnailer
//! error, and the `InvalidEventError` raised when an incoming event cannot be
//! interpreted. Component crates define their own error enums (storage,
//! transform, pipeline) and implement `ErrorMetadata` for them so the boundary
//! adapter can log and respond uniformly.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected, harmless failures
    Debug,
    /// Warning level - for bad input that will be dropped
    Warn,
    /// Error level - for unexpected or transient failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// to the delivery infrastructure.
pub trait ErrorMetadata {
    /// HTTP status code to return to the trigger infrastructure
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_EVENT")
    fn error_code(&self) -> &'static str;

    /// Whether redelivering the same event may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Malformed or incomplete event payload. Never retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEventError {
    #[error("Event is missing the source blob url")]
    MissingUrl,

    #[error("Malformed source url '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Source url '{0}' does not name a blob inside a container")]
    MissingBlobPath(String),

    #[error("Malformed event payload: {0}")]
    MalformedPayload(String),
}

impl ErrorMetadata for InvalidEventError {
    fn http_status_code(&self) -> u16 {
        400
    }

    fn error_code(&self) -> &'static str {
        "INVALID_EVENT"
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Warn
    }
}

impl From<serde_json::Error> for InvalidEventError {
    fn from(err: serde_json::Error) -> Self {
        InvalidEventError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_event_is_not_recoverable() {
        let err = InvalidEventError::MissingUrl;
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_EVENT");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_malformed_url_message_names_the_url() {
        let err = InvalidEventError::MalformedUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
    }
}
