use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::num::NonZeroU32;

/// Output size of a thumbnail and the integer divisor it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailDimensions {
    pub width: u32,
    pub height: u32,
    pub divisor: u32,
}

/// Compute thumbnail dimensions for a source image.
///
/// The divisor is the floor of `orig_width / target_width`, clamped to 1 so
/// sources no wider than the target keep their height. The height is
/// `orig_height / divisor` rounded half up, and never below 1.
pub fn calculate_dimensions(
    orig_width: u32,
    orig_height: u32,
    target_width: NonZeroU32,
) -> ThumbnailDimensions {
    let target = target_width.get();
    let divisor = (orig_width / target).max(1);

    let rounded = (u64::from(orig_height) + u64::from(divisor / 2)) / u64::from(divisor);
    let height = u32::try_from(rounded).unwrap_or(u32::MAX).max(1);

    ThumbnailDimensions {
        width: target,
        height,
        divisor,
    }
}

/// Select appropriate filter type based on resize ratio
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Resize image to exact dimensions
pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}
