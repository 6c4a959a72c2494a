//! Thumbnailer Core Library
//!
//! This crate provides the configuration, error metadata, event models and
//! storage backend selection shared by every thumbnailer component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LogFormat, SourceAccess, ThumbnailConfig};
pub use error::{ErrorMetadata, InvalidEventError, LogLevel};
pub use models::{
    CreationEvent, EventGridEvent, SubscriptionValidationData,
    SubscriptionValidationResponse,
};
pub use storage_types::StorageBackend;
