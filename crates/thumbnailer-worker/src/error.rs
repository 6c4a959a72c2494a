use thumbnailer_core::{ErrorMetadata, InvalidEventError, LogLevel};
use thumbnailer_processing::TransformError;
use thumbnailer_storage::StorageError;

/// Failure of a single event; carries the underlying error unmodified
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidEvent(#[from] InvalidEventError),

    #[error("Failed to read source blob: {0}")]
    Read(#[source] StorageError),

    #[error("Failed to write thumbnail: {0}")]
    Write(#[source] StorageError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ErrorMetadata for PipelineError {
    fn http_status_code(&self) -> u16 {
        match self {
            PipelineError::InvalidEvent(e) => e.http_status_code(),
            PipelineError::Read(e) | PipelineError::Write(e) => e.http_status_code(),
            PipelineError::Transform(e) => e.http_status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::InvalidEvent(e) => e.error_code(),
            PipelineError::Read(e) | PipelineError::Write(e) => e.error_code(),
            PipelineError::Transform(e) => e.error_code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            PipelineError::InvalidEvent(e) => e.is_recoverable(),
            PipelineError::Read(e) | PipelineError::Write(e) => e.is_recoverable(),
            PipelineError::Transform(e) => e.is_recoverable(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::InvalidEvent(e) => e.log_level(),
            PipelineError::Read(e) | PipelineError::Write(e) => e.log_level(),
            PipelineError::Transform(e) => e.log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_delegates_to_source() {
        let err = PipelineError::from(InvalidEventError::MissingUrl);
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_EVENT");
        assert!(!err.is_recoverable());

        let err = PipelineError::Read(StorageError::NotFound("x".to_string()));
        assert_eq!(err.http_status_code(), 404);
        assert!(err.is_recoverable());

        let err = PipelineError::Write(StorageError::WriteFailed("timeout".to_string()));
        assert_eq!(err.http_status_code(), 502);
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_read_and_write_are_distinguished_in_messages() {
        let read = PipelineError::Read(StorageError::ReadFailed("boom".to_string()));
        let write = PipelineError::Write(StorageError::WriteFailed("boom".to_string()));
        assert!(read.to_string().starts_with("Failed to read source blob"));
        assert!(write.to_string().starts_with("Failed to write thumbnail"));
    }
}
