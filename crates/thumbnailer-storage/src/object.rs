//! Cloud object storage (Azure Blob Storage, S3) through `object_store`.
//!
//! One `ObjectStorage` serves any container of the configured account: the
//! source container comes from the event URL and the destination container
//! from configuration, so a client is built per call for the container involved.

#[cfg(feature = "storage-azure")]
use crate::connection_string::AzureConnectionString;
use crate::keys::parse_blob_url;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
#[cfg(feature = "storage-s3")]
use object_store::aws::AmazonS3Builder;
#[cfg(feature = "storage-azure")]
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, GetOptions, ObjectStore, PutOptions, PutPayload,
};

#[derive(Clone, Debug)]
enum Provider {
    #[cfg(feature = "storage-azure")]
    Azure(AzureConnectionString),
    #[cfg(feature = "storage-s3")]
    S3 {
        region: String,
        /// Custom endpoint for S3-compatible providers
        endpoint: Option<String>,
    },
}

/// Object storage implementation
#[derive(Clone, Debug)]
pub struct ObjectStorage {
    provider: Provider,
}

impl ObjectStorage {
    /// Azure Blob Storage account described by a connection string
    #[cfg(feature = "storage-azure")]
    pub fn azure(connection_string: &str) -> StorageResult<Self> {
        let parsed = AzureConnectionString::parse(connection_string)?;
        tracing::info!(
            account = %parsed.account_name,
            emulator = parsed.use_emulator,
            "Azure blob storage configured"
        );
        Ok(ObjectStorage {
            provider: Provider::Azure(parsed),
        })
    }

    /// S3 (or S3-compatible) storage; containers are buckets
    ///
    /// Credentials come from the standard AWS environment variables.
    #[cfg(feature = "storage-s3")]
    pub fn s3(region: String, endpoint: Option<String>) -> Self {
        tracing::info!(region = %region, endpoint = ?endpoint, "S3 storage configured");
        ObjectStorage {
            provider: Provider::S3 { region, endpoint },
        }
    }

    fn store_for(&self, container: &str) -> StorageResult<Box<dyn ObjectStore>> {
        match &self.provider {
            #[cfg(feature = "storage-azure")]
            Provider::Azure(conn) => {
                let mut builder = MicrosoftAzureBuilder::new()
                    .with_account(conn.account_name.clone())
                    .with_container_name(container);

                if let Some(ref key) = conn.account_key {
                    builder = builder.with_access_key(key.clone());
                }
                if let Some(ref sas) = conn.sas_token {
                    builder = builder.with_config(AzureConfigKey::SasKey, sas.clone());
                }
                if let Some(ref endpoint) = conn.blob_endpoint {
                    let allow_http = endpoint.starts_with("http://");
                    builder = builder
                        .with_endpoint(endpoint.clone())
                        .with_allow_http(allow_http);
                }
                if conn.use_emulator {
                    builder = builder.with_use_emulator(true).with_allow_http(true);
                }

                let store = builder
                    .build()
                    .map_err(|e| StorageError::ConfigError(e.to_string()))?;
                Ok(Box::new(store))
            }
            #[cfg(feature = "storage-s3")]
            Provider::S3 { region, endpoint } => {
                let mut builder = AmazonS3Builder::from_env()
                    .with_region(region.clone())
                    .with_bucket_name(container);

                if let Some(ref endpoint) = endpoint {
                    let allow_http = endpoint.starts_with("http://");
                    builder = builder
                        .with_endpoint(endpoint.clone())
                        .with_allow_http(allow_http);
                }

                let store = builder
                    .build()
                    .map_err(|e| StorageError::ConfigError(e.to_string()))?;
                Ok(Box::new(store))
            }
        }
    }
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn read(&self, url: &str) -> StorageResult<Bytes> {
        let location = parse_blob_url(url).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        let store = self.store_for(&location.container)?;
        let path = Path::from(location.name.as_str());
        let start = std::time::Instant::now();

        let result = store
            .get_opts(&path, GetOptions::default())
            .await
            .map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(url.to_string()),
                other => {
                    tracing::error!(
                        error = %other,
                        container = %location.container,
                        key = %location.name,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Object storage read failed"
                    );
                    StorageError::ReadFailed(other.to_string())
                }
            })?;

        let data = result
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        tracing::info!(
            container = %location.container,
            key = %location.name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage read successful"
        );

        Ok(data)
    }

    async fn write(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let store = self.store_for(container)?;
        let path = Path::from(key);
        let size = data.len();
        let start = std::time::Instant::now();

        let attributes = Attributes::from_iter([(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        )]);
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        store
            .put_opts(&path, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %container,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object storage write failed"
                );
                StorageError::WriteFailed(e.to_string())
            })?;

        tracing::info!(
            container = %container,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage write successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        match self.provider {
            #[cfg(feature = "storage-azure")]
            Provider::Azure(_) => StorageBackend::Azure,
            #[cfg(feature = "storage-s3")]
            Provider::S3 { .. } => StorageBackend::S3,
        }
    }
}
