//! Thumbnail transformer
//!
//! Decodes a source image, scales it to the configured width and writes it back
//! out with the codec picked by the encoder table. The work is CPU-bound, so
//! async callers go through `transform_async`, which runs on the blocking pool.

use crate::image::encoder::EncodingKind;
use crate::image::resize::{calculate_dimensions, resize_image};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageError};
use std::io::Cursor;
use std::num::NonZeroU32;
use thumbnailer_core::{ErrorMetadata, LogLevel};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to decode source image: {0}")]
    Decode(#[source] ImageError),

    #[error("No encoder for {0} output")]
    UnsupportedEncoding(EncodingKind),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] ImageError),

    #[error("Thumbnail task failed: {0}")]
    Task(String),
}

impl ErrorMetadata for TransformError {
    // Non-recoverable variants must stay on 400, which Event Grid never redelivers
    fn http_status_code(&self) -> u16 {
        match self {
            TransformError::Decode(_) | TransformError::UnsupportedEncoding(_) => 400,
            TransformError::Encode(_) | TransformError::Task(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TransformError::Decode(_) => "IMAGE_DECODE_FAILED",
            TransformError::UnsupportedEncoding(_) => "UNSUPPORTED_ENCODING",
            TransformError::Encode(_) => "IMAGE_ENCODE_FAILED",
            TransformError::Task(_) => "TRANSFORM_TASK_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, TransformError::Encode(_) | TransformError::Task(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            TransformError::Decode(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// Encoded thumbnail plus the geometry it was produced from
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub encoding: EncodingKind,
}

#[derive(Debug, Clone, Copy)]
pub struct ThumbnailTransformer {
    target_width: NonZeroU32,
}

impl ThumbnailTransformer {
    pub fn new(target_width: NonZeroU32) -> Self {
        Self { target_width }
    }

    /// Decode `data`, resize it to the target width and encode it as `encoding`.
    ///
    /// Deterministic: the same input bytes always produce the same output bytes.
    pub fn transform(
        &self,
        data: &[u8],
        encoding: EncodingKind,
    ) -> Result<Thumbnail, TransformError> {
        let format = encoding
            .image_format()
            .ok_or(TransformError::UnsupportedEncoding(encoding))?;

        let img = image::load_from_memory(data).map_err(TransformError::Decode)?;
        let (source_width, source_height) = img.dimensions();

        let dims = calculate_dimensions(source_width, source_height, self.target_width);
        let resized = resize_image(&img, dims.width, dims.height);

        let encodable = match encoding {
            EncodingKind::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
            EncodingKind::Gif => DynamicImage::ImageRgba8(resized.to_rgba8()),
            _ => resized,
        };

        let estimated_size = (dims.width as usize) * (dims.height as usize) * 3;
        let mut buffer = Cursor::new(Vec::with_capacity(estimated_size));
        encodable
            .write_to(&mut buffer, format)
            .map_err(TransformError::Encode)?;

        tracing::debug!(
            source_width,
            source_height,
            width = dims.width,
            height = dims.height,
            divisor = dims.divisor,
            encoding = %encoding,
            "Thumbnail generated"
        );

        Ok(Thumbnail {
            data: Bytes::from(buffer.into_inner()),
            width: dims.width,
            height: dims.height,
            source_width,
            source_height,
            encoding,
        })
    }

    /// `transform` on the blocking thread pool
    pub async fn transform_async(
        &self,
        data: Bytes,
        encoding: EncodingKind,
    ) -> Result<Thumbnail, TransformError> {
        let transformer = *self;
        tokio::task::spawn_blocking(move || transformer.transform(&data, encoding))
            .await
            .map_err(|e| TransformError::Task(e.to_string()))?
    }
}
