//! Image processing module
//!
//! - Output encoding lookup by file extension (encoder)
//! - Thumbnail dimension math and resampling (resize)
//! - Decode, resize and re-encode (transformer)

pub mod encoder;
pub mod resize;
pub mod transformer;

pub use encoder::{select_encoder, EncodingKind};
pub use resize::{calculate_dimensions, ThumbnailDimensions};
pub use transformer::{Thumbnail, ThumbnailTransformer, TransformError};
