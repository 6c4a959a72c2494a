//! Shared blob URL parsing and destination key derivation.
//!
//! URL format: `scheme://account-host/{container}/{blob name...}`. The blob name
//! is percent-decoded and becomes the destination key of the thumbnail.

use percent_encoding::percent_decode_str;
use thumbnailer_core::InvalidEventError;
use url::Url;

/// Container and blob name addressed by a source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation {
    pub container: String,
    pub name: String,
}

impl BlobLocation {
    pub fn extension(&self) -> &str {
        blob_extension(&self.name)
    }
}

/// Split a fully qualified blob URL into container and blob name.
pub fn parse_blob_url(raw: &str) -> Result<BlobLocation, InvalidEventError> {
    let malformed = |reason: &str| InvalidEventError::MalformedUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| malformed(&e.to_string()))?;
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(malformed("expected an absolute url with a host"));
    }

    let mut segments = url
        .path_segments()
        .ok_or_else(|| malformed("url has no path"))?;

    let container = segments
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| InvalidEventError::MissingBlobPath(raw.to_string()))?;
    let name = segments.collect::<Vec<_>>().join("/");
    if name.is_empty() {
        return Err(InvalidEventError::MissingBlobPath(raw.to_string()));
    }

    let decode = |segment: &str| {
        percent_decode_str(segment)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .map_err(|_| malformed("path is not valid UTF-8 once percent-decoded"))
    };

    Ok(BlobLocation {
        container: decode(container)?,
        name: decode(&name)?,
    })
}

/// Destination key for the thumbnail of the blob at `url`.
///
/// Assumes the destination container differs from the source container; the
/// same source always maps to the same key, so reprocessing overwrites.
pub fn derive_destination_key(url: &str) -> Result<String, InvalidEventError> {
    parse_blob_url(url).map(|location| location.name)
}

/// Extension of a blob name without the dot, or `""` when there is none.
pub fn blob_extension(name: &str) -> &str {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .unwrap_or("")
}
