//! Event pipeline
//!
//! One call to `EventPipeline::handle` processes one blob-created event:
//!
//! 1. Validate the event (url present, well formed, names a blob)
//! 2. Resolve the output encoding from the blob's extension
//! 3. Unsupported extension: log and finish without touching storage
//! 4. Read the source, build the thumbnail, derive the key, write it
//!
//! Errors are returned as-is; logging them and signalling the host is left to
//! the caller.

use crate::error::PipelineError;
use std::sync::Arc;
use thumbnailer_core::{CreationEvent, InvalidEventError, ThumbnailConfig};
use thumbnailer_processing::{select_encoder, ThumbnailTransformer};
use thumbnailer_storage::{derive_destination_key, parse_blob_url, Storage};

/// Result of a successfully handled event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Extension has no encoder; nothing was read or written
    Skipped { extension: String },
    Written {
        container: String,
        key: String,
        content_type: &'static str,
        size_bytes: usize,
        width: u32,
        height: u32,
    },
}

#[derive(Clone)]
pub struct EventPipeline {
    storage: Arc<dyn Storage>,
    transformer: ThumbnailTransformer,
    destination_container: String,
}

impl EventPipeline {
    pub fn new(storage: Arc<dyn Storage>, config: &ThumbnailConfig) -> Self {
        Self {
            storage,
            transformer: ThumbnailTransformer::new(config.thumbnail_width),
            destination_container: config.destination_container.clone(),
        }
    }

    #[tracing::instrument(
        skip(self, event),
        fields(
            url = ?event.source_url,
            content_type = ?event.content_type,
            operation = "create_thumbnail"
        )
    )]
    pub async fn handle(&self, event: &CreationEvent) -> Result<PipelineOutcome, PipelineError> {
        let url = event
            .source_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(InvalidEventError::MissingUrl)?;
        let location = parse_blob_url(url)?;

        let extension = location.extension();
        let encoding = select_encoder(extension);
        let Some(content_type) = encoding.content_type() else {
            tracing::info!(
                extension = %extension,
                "No encoder for image type, skipping thumbnail"
            );
            return Ok(PipelineOutcome::Skipped {
                extension: extension.to_string(),
            });
        };

        let source = self.storage.read(url).await.map_err(PipelineError::Read)?;
        let thumbnail = self.transformer.transform_async(source, encoding).await?;

        let key = derive_destination_key(url)?;
        let size_bytes = thumbnail.data.len();

        self.storage
            .write(
                &self.destination_container,
                &key,
                thumbnail.data,
                content_type,
            )
            .await
            .map_err(PipelineError::Write)?;

        tracing::info!(
            container = %self.destination_container,
            key = %key,
            source_width = thumbnail.source_width,
            source_height = thumbnail.source_height,
            width = thumbnail.width,
            height = thumbnail.height,
            size_bytes,
            "Thumbnail written"
        );

        Ok(PipelineOutcome::Written {
            container: self.destination_container.clone(),
            key,
            content_type,
            size_bytes,
            width: thumbnail.width,
            height: thumbnail.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::num::NonZeroU32;
    use thumbnailer_core::{ErrorMetadata, SourceAccess};
    use thumbnailer_processing::TransformError;
    use thumbnailer_storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};

    const ACCOUNT: &str = "https://acct.blob.core.windows.net";

    fn config(width: u32) -> ThumbnailConfig {
        ThumbnailConfig {
            thumbnail_width: NonZeroU32::new(width).unwrap(),
            destination_container: "thumbnails".to_string(),
            source_access: SourceAccess {
                backend: StorageBackend::Memory,
                ..Default::default()
            },
        }
    }

    fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn pipeline(storage: &MemoryStorage, width: u32) -> EventPipeline {
        EventPipeline::new(Arc::new(storage.clone()), &config(width))
    }

    /// Storage double whose reads and writes fail on demand
    struct FailingStorage {
        inner: MemoryStorage,
        fail_reads: bool,
        fail_writes: bool,
    }

    #[async_trait]
    impl Storage for FailingStorage {
        async fn read(&self, url: &str) -> StorageResult<Bytes> {
            if self.fail_reads {
                return Err(StorageError::ReadFailed("connection reset".to_string()));
            }
            self.inner.read(url).await
        }

        async fn write(
            &self,
            container: &str,
            key: &str,
            data: Bytes,
            content_type: &str,
        ) -> StorageResult<()> {
            if self.fail_writes {
                return Err(StorageError::WriteFailed("throttled".to_string()));
            }
            self.inner.write(container, key, data, content_type).await
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Memory
        }
    }

    #[tokio::test]
    async fn test_jpeg_source_written_as_jpeg_thumbnail() {
        let storage = MemoryStorage::new();
        storage.insert(
            "images",
            "photos/cat.jpg",
            image_bytes(1920, 1080, ImageFormat::Jpeg),
            "image/jpeg",
        );

        let event = CreationEvent::new(format!("{ACCOUNT}/images/photos/cat.jpg"));
        let outcome = pipeline(&storage, 480).handle(&event).await.unwrap();

        match outcome {
            PipelineOutcome::Written {
                ref container,
                ref key,
                content_type,
                width,
                height,
                ..
            } => {
                assert_eq!(container, "thumbnails");
                assert_eq!(key, "photos/cat.jpg");
                assert_eq!(content_type, "image/jpeg");
                assert_eq!((width, height), (480, 270));
            }
            other => panic!("expected a written thumbnail, got {other:?}"),
        }

        let blob = storage.get("thumbnails", "photos/cat.jpg").unwrap();
        assert_eq!(blob.content_type, "image/jpeg");
        let decoded = image::load_from_memory_with_format(&blob.data, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (480, 270));
    }

    #[tokio::test]
    async fn test_png_at_target_width_keeps_dimensions() {
        let storage = MemoryStorage::new();
        storage.insert(
            "images",
            "square.PNG",
            image_bytes(480, 480, ImageFormat::Png),
            "image/png",
        );

        let event = CreationEvent::new(format!("{ACCOUNT}/images/square.PNG"));
        pipeline(&storage, 480).handle(&event).await.unwrap();

        let blob = storage.get("thumbnails", "square.PNG").unwrap();
        assert_eq!(blob.content_type, "image/png");
        let decoded = image::load_from_memory_with_format(&blob.data, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (480, 480));
    }

    #[tokio::test]
    async fn test_small_source_uses_clamped_divisor() {
        let storage = MemoryStorage::new();
        storage.insert(
            "images",
            "tiny.jpeg",
            image_bytes(200, 150, ImageFormat::Jpeg),
            "image/jpeg",
        );

        let event = CreationEvent::new(format!("{ACCOUNT}/images/tiny.jpeg"));
        let outcome = pipeline(&storage, 480).handle(&event).await.unwrap();

        assert!(matches!(
            outcome,
            PipelineOutcome::Written {
                width: 480,
                height: 150,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_skipped_without_storage_calls() {
        let storage = MemoryStorage::new();
        storage.insert("images", "scan.bmp", Bytes::from_static(b"BM"), "image/bmp");

        let event = CreationEvent::new(format!("{ACCOUNT}/images/scan.bmp"));
        let outcome = pipeline(&storage, 480).handle(&event).await.unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::Skipped {
                extension: "bmp".to_string()
            }
        );
        assert_eq!(storage.read_count(), 0);
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_blob_without_extension_is_skipped() {
        let storage = MemoryStorage::new();
        let event = CreationEvent::new(format!("{ACCOUNT}/images/README"));
        let outcome = pipeline(&storage, 480).handle(&event).await.unwrap();

        assert!(matches!(outcome, PipelineOutcome::Skipped { .. }));
        assert_eq!(storage.read_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_url_is_invalid_event() {
        let storage = MemoryStorage::new();
        let p = pipeline(&storage, 480);

        for event in [
            CreationEvent::default(),
            CreationEvent::new(""),
            CreationEvent::new("   "),
        ] {
            let err = p.handle(&event).await.unwrap_err();
            assert!(matches!(
                err,
                PipelineError::InvalidEvent(InvalidEventError::MissingUrl)
            ));
            assert_eq!(err.http_status_code(), 400);
        }
        assert_eq!(storage.read_count(), 0);
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid_event() {
        let storage = MemoryStorage::new();
        let p = pipeline(&storage, 480);

        for url in ["not a url", "https://acct.blob.core.windows.net/images"] {
            let err = p.handle(&CreationEvent::new(url)).await.unwrap_err();
            assert!(
                matches!(err, PipelineError::InvalidEvent(_)),
                "{url}: {err:?}"
            );
        }
        assert_eq!(storage.read_count(), 0);
    }

    #[tokio::test]
    async fn test_reprocessing_overwrites_with_identical_bytes() {
        let storage = MemoryStorage::new();
        storage.insert(
            "images",
            "a/b/c.gif",
            image_bytes(960, 101, ImageFormat::Png),
            "image/gif",
        );
        let p = pipeline(&storage, 480);
        let event = CreationEvent::new(format!("{ACCOUNT}/images/a/b/c.gif"));

        p.handle(&event).await.unwrap();
        let first = storage.get("thumbnails", "a/b/c.gif").unwrap();
        p.handle(&event).await.unwrap();
        let second = storage.get("thumbnails", "a/b/c.gif").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.content_type, "image/gif");
        assert_eq!(storage.write_count(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_source_is_decode_error() {
        let storage = MemoryStorage::new();
        storage.insert("images", "broken.png", Bytes::from_static(b"\x89PNG nope"), "image/png");

        let event = CreationEvent::new(format!("{ACCOUNT}/images/broken.png"));
        let err = pipeline(&storage, 480).handle(&event).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Transform(TransformError::Decode(_))
        ));
        assert_eq!(err.http_status_code(), 400);
        assert!(!err.is_recoverable());
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_blob_is_read_error() {
        let storage = MemoryStorage::new();
        let event = CreationEvent::new(format!("{ACCOUNT}/images/gone.jpg"));
        let err = pipeline(&storage, 480).handle(&event).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Read(StorageError::NotFound(_))
        ));
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failures_propagate_unmodified() {
        let inner = MemoryStorage::new();
        inner.insert(
            "images",
            "cat.png",
            image_bytes(960, 540, ImageFormat::Png),
            "image/png",
        );
        let event = CreationEvent::new(format!("{ACCOUNT}/images/cat.png"));

        let read_failing = FailingStorage {
            inner: inner.clone(),
            fail_reads: true,
            fail_writes: false,
        };
        let err = EventPipeline::new(Arc::new(read_failing), &config(480))
            .handle(&event)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Read(StorageError::ReadFailed(ref msg)) if msg == "connection reset"
        ));
        assert!(err.is_recoverable());

        let write_failing = FailingStorage {
            inner: inner.clone(),
            fail_reads: false,
            fail_writes: true,
        };
        let err = EventPipeline::new(Arc::new(write_failing), &config(480))
            .handle(&event)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Write(StorageError::WriteFailed(ref msg)) if msg == "throttled"
        ));
        assert!(inner.get("thumbnails", "cat.png").is_none());
    }
}
