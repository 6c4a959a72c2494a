//! Thumbnailer Image Processing Library
//!
//! This crate provides the encoder selection table and the thumbnail
//! transformer (decode, proportional resize, re-encode).

pub mod image;

// Re-export commonly used types
pub use self::image::{
    calculate_dimensions, select_encoder, EncodingKind, Thumbnail, ThumbnailDimensions,
    ThumbnailTransformer, TransformError,
};
