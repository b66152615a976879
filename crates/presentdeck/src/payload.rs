//! Opaque asset payloads and their persisted encoding.
//!
//! A payload is the raw bytes of a logo image or a video together with its
//! media type. In the store it is kept as a base64 `data:` URI so that every
//! slot is self-describing.

use std::fmt;
use std::path::Path;

use base64::Engine;

use crate::error::{Error, Result};

/// Media type used when nothing more specific is known.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Known file extensions and their media types.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("ogv", "video/ogg"),
];

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// The bytes of a single asset slot plus their media type.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    media_type: String,
    data: Vec<u8>,
}

impl Payload {
    /// Create a payload from raw bytes.
    #[must_use]
    pub fn new(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    /// Read a payload from a file, guessing the media type from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(DEFAULT_MEDIA_TYPE, media_type_for_extension);
        Ok(Self::new(media_type, data))
    }

    /// The media type, e.g. `image/png`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The raw bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check the payload survives the data URI encoding unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the media type is empty or
    /// contains a `,`.
    pub fn validate(&self) -> Result<()> {
        if self.media_type.is_empty() {
            return Err(Error::invalid_record("payload media type must not be empty"));
        }
        if self.media_type.contains(',') {
            return Err(Error::invalid_record(format!(
                "payload media type must not contain ',': {}",
                self.media_type
            )));
        }
        Ok(())
    }

    /// Hex-encoded BLAKE3 digest of the bytes.
    #[must_use]
    pub fn digest(&self) -> String {
        blake3::hash(&self.data).to_hex().to_string()
    }

    /// File extension matching the media type, if it is a known one.
    #[must_use]
    pub fn file_extension(&self) -> Option<&'static str> {
        MEDIA_TYPES
            .iter()
            .find(|(_, media_type)| *media_type == self.media_type)
            .map(|(ext, _)| *ext)
    }

    /// Encode as a `data:<media type>;base64,<bytes>` URI.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!(
            "{DATA_URI_PREFIX}{}{BASE64_MARKER},{encoded}",
            self.media_type
        )
    }

    /// Decode a base64 data URI produced by [`Payload::to_data_uri`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the string is not a base64 data URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(DATA_URI_PREFIX)
            .ok_or_else(|| Error::invalid_record("payload is not a data URI"))?;
        let (header, encoded) = rest
            .split_once(',')
            .ok_or_else(|| Error::invalid_record("data URI has no payload separator"))?;
        let media_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| Error::invalid_record("data URI is not base64 encoded"))?;
        let media_type = if media_type.is_empty() {
            DEFAULT_MEDIA_TYPE
        } else {
            media_type
        };

        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::invalid_record(format!("invalid base64 payload: {e}")))?;

        Ok(Self::new(media_type, data))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Look up the media type for a file extension (case-insensitive).
#[must_use]
pub fn media_type_for_extension(ext: &str) -> &'static str {
    let ext = ext.to_ascii_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(DEFAULT_MEDIA_TYPE, |(_, media_type)| *media_type)
}
