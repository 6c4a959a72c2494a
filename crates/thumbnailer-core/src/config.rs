//! Configuration module
//!
//! This module provides the configuration structures for the thumbnail webhook:
//! server settings, the thumbnail target, and the source-access descriptor
//! handed to the storage collaborator.

use std::env;
use std::fmt;
use std::num::NonZeroU32;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 7071;
const THUMBNAIL_WIDTH: u32 = 100;
const THUMBNAIL_CONTAINER_NAME: &str = "thumbnails";

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Process-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Opaque credential/connection descriptor. Only the storage collaborator
/// looks inside it.
#[derive(Clone, Default)]
pub struct SourceAccess {
    pub backend: StorageBackend,
    /// Azure storage connection string
    pub connection_string: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO etc.)
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
}

impl fmt::Debug for SourceAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceAccess")
            .field("backend", &self.backend)
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "<redacted>"),
            )
            .field("s3_region", &self.s3_region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("local_storage_path", &self.local_storage_path)
            .finish()
    }
}

/// Thumbnail generation settings
#[derive(Clone, Debug)]
pub struct ThumbnailConfig {
    pub thumbnail_width: NonZeroU32,
    pub destination_container: String,
    pub source_access: SourceAccess,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub thumbnail: ThumbnailConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match var("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a port number: {}", e))?,
            None => SERVER_PORT,
        };

        let log_format = match var("LOG_FORMAT").map(|v| v.trim().to_lowercase()) {
            Some(ref v) if v == "json" => LogFormat::Json,
            Some(ref v) if v == "pretty" || v == "text" => LogFormat::Pretty,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                    other
                ))
            }
            None => LogFormat::default(),
        };

        let raw_width = match var("THUMBNAIL_WIDTH") {
            Some(width) => width.trim().parse::<u32>().map_err(|e| {
                anyhow::anyhow!("THUMBNAIL_WIDTH must be a positive integer: {}", e)
            })?,
            None => THUMBNAIL_WIDTH,
        };
        let thumbnail_width = NonZeroU32::new(raw_width)
            .ok_or_else(|| anyhow::anyhow!("THUMBNAIL_WIDTH must be greater than zero"))?;

        let destination_container = var("THUMBNAIL_CONTAINER_NAME")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| THUMBNAIL_CONTAINER_NAME.to_string());

        let backend = match var("STORAGE_BACKEND") {
            Some(backend) => backend.parse::<StorageBackend>()?,
            None => StorageBackend::default(),
        };

        let source_access = SourceAccess {
            backend,
            connection_string: var("BLOB_STORAGE_CONNECTION_STRING")
                .or_else(|| var("AzureWebJobsStorage")),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
        };

        let config = Config {
            base: BaseConfig {
                server_port,
                environment,
                log_format,
            },
            thumbnail: ThumbnailConfig {
                thumbnail_width,
                destination_container,
                source_access,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.thumbnail.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn log_format(&self) -> LogFormat {
        self.base.log_format
    }

    pub fn thumbnail_width(&self) -> NonZeroU32 {
        self.thumbnail.thumbnail_width
    }

    pub fn destination_container(&self) -> &str {
        &self.thumbnail.destination_container
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.thumbnail.source_access.backend
    }
}

impl ThumbnailConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let container = &self.destination_container;
        if container.is_empty() {
            return Err(anyhow::anyhow!("THUMBNAIL_CONTAINER_NAME must not be empty"));
        }
        if container.contains('/') {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_CONTAINER_NAME must be a single container name, got '{}'",
                container
            ));
        }

        let access = &self.source_access;
        match access.backend {
            StorageBackend::Azure if access.connection_string.is_none() => Err(anyhow::anyhow!(
                "STORAGE_BACKEND=azure requires BLOB_STORAGE_CONNECTION_STRING or AzureWebJobsStorage"
            )),
            StorageBackend::S3 if access.s3_region.is_none() => Err(anyhow::anyhow!(
                "STORAGE_BACKEND=s3 requires S3_REGION or AWS_REGION"
            )),
            StorageBackend::Local if access.local_storage_path.is_none() => Err(anyhow::anyhow!(
                "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH"
            )),
            _ => Ok(()),
        }
    }
}
