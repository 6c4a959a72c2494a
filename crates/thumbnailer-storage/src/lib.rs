//! Thumbnailer Storage Library
//!
//! This crate provides the storage collaborator used by the thumbnail pipeline:
//! the `Storage` trait, blob URL/key derivation, and backends for Azure Blob
//! Storage and S3 (through `object_store`), the local filesystem, and memory.
//!
//! # Blob URL format
//!
//! Source blobs are addressed by path-style URLs:
//!
//! - `scheme://account-host/{container}/{blob name...}`
//!
//! The destination key of a thumbnail is the blob name, i.e. everything after
//! the container segment. Parsing is centralized in the `keys` module so all
//! backends and the pipeline agree on it.

#[cfg(feature = "storage-azure")]
pub mod connection_string;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(any(feature = "storage-azure", feature = "storage-s3"))]
pub mod object;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use connection_string::AzureConnectionString;
pub use factory::create_storage;
pub use keys::{blob_extension, derive_destination_key, parse_blob_url, BlobLocation};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::{MemoryStorage, StoredBlob};
#[cfg(any(feature = "storage-azure", feature = "storage-s3"))]
pub use object::ObjectStorage;
pub use thumbnailer_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
