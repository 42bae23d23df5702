//! Image payloads accepted for extraction.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ::image::ImageFormat;

use crate::error::{Result, ScanError};

/// Image types accepted by the upload gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
    Gif,
}

impl ImageMime {
    /// All accepted types, in the order they are offered to the user.
    pub const ALL: [ImageMime; 3] = [ImageMime::Png, ImageMime::Jpeg, ImageMime::Gif];

    /// The mime type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Gif => "image/gif",
        }
    }

    /// Parse a mime type string.
    pub fn from_mime(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageMime::Png),
            "image/jpeg" | "image/jpg" => Some(ImageMime::Jpeg),
            "image/gif" => Some(ImageMime::Gif),
            _ => None,
        }
    }

    /// Guess from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageMime::Png),
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "gif" => Some(ImageMime::Gif),
            _ => None,
        }
    }

    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(ImageMime::Png),
            ImageFormat::Jpeg => Some(ImageMime::Jpeg),
            ImageFormat::Gif => Some(ImageMime::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image fully read into memory, with its detected type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime: ImageMime,
    bytes: Vec<u8>,
}

impl ImagePayload {
    /// Validate raw bytes by their magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = ::image::guess_format(&bytes)
            .map_err(|_| ScanError::InvalidImagePayload("unrecognized image format".to_string()))?;

        let mime = ImageMime::from_format(format).ok_or_else(|| {
            ScanError::InvalidImagePayload(format!(
                "{:?} images are not supported (expected PNG, JPEG or GIF)",
                format
            ))
        })?;

        Ok(Self { mime, bytes })
    }

    /// Parse a `data:<mime>;base64,<data>` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let invalid = || ScanError::InvalidImagePayload("Invalid image data URL".to_string());

        let rest = url.strip_prefix("data:").ok_or_else(invalid)?;
        let (mime, data) = rest.split_once(";base64,").ok_or_else(invalid)?;
        if mime.is_empty() {
            return Err(invalid());
        }
        let mime = ImageMime::from_mime(mime).ok_or_else(|| {
            ScanError::InvalidImagePayload(format!("unsupported image type: {}", mime))
        })?;
        let bytes = STANDARD.decode(data.trim()).map_err(|_| invalid())?;

        Ok(Self { mime, bytes })
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 body, as sent inline to the vision service.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Self-contained `data:` URL, used as the receipt thumbnail.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }
}

/// Read an image file into memory and check its type.
#[cfg(feature = "native")]
pub async fn read_image(path: impl AsRef<std::path::Path>) -> Result<ImagePayload> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(ScanError::FileRead)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read image");
    ImagePayload::from_bytes(bytes)
}
