//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use thumbnailer_core::{ErrorMetadata, LogLevel};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid blob url: {0}")]
    InvalidUrl(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorMetadata for StorageError {
    fn http_status_code(&self) -> u16 {
        match self {
            StorageError::NotFound(_) => 404,
            StorageError::InvalidKey(_) | StorageError::InvalidUrl(_) => 400,
            _ => 502,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "BLOB_NOT_FOUND",
            StorageError::InvalidKey(_) | StorageError::InvalidUrl(_) => "INVALID_BLOB_LOCATION",
            StorageError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
            _ => "STORAGE_ERROR",
        }
    }

    /// A missing blob can still appear (eventual consistency), so only
    /// malformed locations are terminal.
    fn is_recoverable(&self) -> bool {
        !matches!(self, StorageError::InvalidKey(_) | StorageError::InvalidUrl(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::InvalidKey(_) | StorageError::InvalidUrl(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// Storage abstraction trait
///
/// The thumbnail pipeline only ever reads a source blob by its URL and writes a
/// thumbnail into a container under a key. Writes overwrite, so redelivered
/// events are safe to process again.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the full contents of the blob addressed by `url`
    async fn read(&self, url: &str) -> StorageResult<Bytes>;

    /// Write `data` to `container/key`, replacing any existing blob
    async fn write(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
