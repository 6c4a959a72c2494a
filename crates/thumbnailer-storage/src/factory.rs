#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::MemoryStorage;
#[cfg(any(feature = "storage-azure", feature = "storage-s3"))]
use crate::ObjectStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use thumbnailer_core::SourceAccess;

/// Create a storage backend based on the source-access descriptor
pub async fn create_storage(access: &SourceAccess) -> StorageResult<Arc<dyn Storage>> {
    match access.backend {
        #[cfg(feature = "storage-azure")]
        StorageBackend::Azure => {
            let connection_string = access.connection_string.as_deref().ok_or_else(|| {
                StorageError::ConfigError(
                    "BLOB_STORAGE_CONNECTION_STRING not configured".to_string(),
                )
            })?;
            Ok(Arc::new(ObjectStorage::azure(connection_string)?))
        }

        #[cfg(not(feature = "storage-azure"))]
        StorageBackend::Azure => Err(StorageError::ConfigError(
            "Azure storage backend not available (storage-azure feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = access.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            Ok(Arc::new(ObjectStorage::s3(region, access.s3_endpoint.clone())))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = access.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            Ok(Arc::new(LocalStorage::new(base_path).await?))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; thumbnails are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
