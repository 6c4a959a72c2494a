use image::ImageFormat;
use std::fmt;

/// Output encoding for a thumbnail, chosen from the source blob's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    Png,
    Jpeg,
    Gif,
    Unsupported,
}

/// Extension lookup table. Supporting a new format means adding a row here.
const ENCODERS: &[(&str, EncodingKind)] = &[
    ("png", EncodingKind::Png),
    ("jpg", EncodingKind::Jpeg),
    ("jpeg", EncodingKind::Jpeg),
    ("gif", EncodingKind::Gif),
];

/// Resolve a file extension (`"png"`, `".JPG"`, ...) to its encoding kind.
///
/// Matching is case-insensitive and tolerates a single leading dot. Anything
/// not in the table, including the empty string, is `Unsupported`.
pub fn select_encoder(extension: &str) -> EncodingKind {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    ENCODERS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(extension))
        .map(|(_, kind)| *kind)
        .unwrap_or(EncodingKind::Unsupported)
}

impl EncodingKind {
    /// Codec used to write the thumbnail
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            EncodingKind::Png => Some(ImageFormat::Png),
            EncodingKind::Jpeg => Some(ImageFormat::Jpeg),
            EncodingKind::Gif => Some(ImageFormat::Gif),
            EncodingKind::Unsupported => None,
        }
    }

    /// MIME type stored alongside the thumbnail
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            EncodingKind::Png => Some("image/png"),
            EncodingKind::Jpeg => Some("image/jpeg"),
            EncodingKind::Gif => Some("image/gif"),
            EncodingKind::Unsupported => None,
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncodingKind::Png => "png",
            EncodingKind::Jpeg => "jpeg",
            EncodingKind::Gif => "gif",
            EncodingKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
