//! In-memory storage backend for tests and local experiments.

use crate::keys::parse_blob_url;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A stored blob and the content type it was written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: String,
}

/// Blobs keyed by `(container, name)`. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<(String, String), StoredBlob>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob without counting it as a write
    pub fn insert(&self, container: &str, name: &str, data: impl Into<Bytes>, content_type: &str) {
        let blob = StoredBlob {
            data: data.into(),
            content_type: content_type.to_string(),
        };
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert((container.to_string(), name.to_string()), blob);
        }
    }

    pub fn get(&self, container: &str, name: &str) -> Option<StoredBlob> {
        self.blobs
            .lock()
            .ok()?
            .get(&(container.to_string(), name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `read` calls served, including failed ones
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `write` calls served, including failed ones
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("memory storage lock poisoned".to_string())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, url: &str) -> StorageResult<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let location = parse_blob_url(url).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;

        let blobs = self.blobs.lock().map_err(|_| Self::poisoned())?;
        blobs
            .get(&(location.container, location.name))
            .map(|blob| blob.data.clone())
            .ok_or_else(|| StorageError::NotFound(url.to_string()))
    }

    async fn write(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let size = data.len();

        let mut blobs = self.blobs.lock().map_err(|_| Self::poisoned())?;
        blobs.insert(
            (container.to_string(), key.to_string()),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );

        tracing::debug!(
            container = %container,
            key = %key,
            size_bytes = size,
            "Memory storage write successful"
        );
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
