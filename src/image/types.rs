//! Core types for source and generated images.

use crate::error::{Result, StudioError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type assumed when a data URI does not carry one.
pub const DEFAULT_SOURCE_MIME: &str = "image/jpeg";

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// The photo a user wants restyled, held in the form the API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    mime_type: String,
    payload: String,
}

impl SourceImage {
    /// Splits a `data:<mime>;base64,<payload>` string into MIME type and payload.
    ///
    /// A bare base64 string is accepted as the payload. When no MIME type can
    /// be recovered, JPEG is assumed.
    pub fn from_data_uri(input: &str) -> Result<Self> {
        let input = input.trim();
        let payload = match input.split_once(',') {
            Some((_, payload)) => payload,
            None => input,
        };

        let mime_type = input
            .split(';')
            .next()
            .and_then(|head| head.split_once(':'))
            .map(|(_, mime)| mime.trim())
            .filter(|mime| !mime.is_empty() && !mime.contains(','))
            .unwrap_or(DEFAULT_SOURCE_MIME);

        if payload.is_empty() {
            return Err(StudioError::InvalidImage("image payload is empty".into()));
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| StudioError::InvalidImage(format!("payload is not base64: {e}")))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Wraps raw image bytes. Falls back to magic-byte detection, then JPEG.
    pub fn from_bytes(data: &[u8], mime_type: Option<&str>) -> Result<Self> {
        if data.is_empty() {
            return Err(StudioError::InvalidImage("image file is empty".into()));
        }
        let mime_type = mime_type
            .map(str::to_string)
            .or_else(|| ImageFormat::from_magic_bytes(data).map(|f| f.mime_type().to_string()))
            .unwrap_or_else(|| DEFAULT_SOURCE_MIME.to_string());

        Ok(Self {
            mime_type,
            payload: base64::engine::general_purpose::STANDARD.encode(data),
        })
    }

    /// Reads an image file, detecting its type from content or extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mime_type = ImageFormat::from_magic_bytes(&data)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .map(|f| f.mime_type());
        Self::from_bytes(&data, mime_type)
    }

    /// MIME type of the image.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload, without any data-URI prefix.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the image as a data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A generated image with its data and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "generated image should be saved or displayed"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format. The service returns PNG.
    pub format: ImageFormat,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
    payload: String,
}

impl GeneratedImage {
    /// Creates a PNG image from a base64 payload returned by the service.
    ///
    /// Whitespace inside the payload is ignored when decoding. The payload
    /// itself is kept as received for [`GeneratedImage::to_data_url`].
    pub fn from_base64_png(payload: &str, metadata: GenerationMetadata) -> Result<Self> {
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let data = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| StudioError::Decode(e.to_string()))?;
        Ok(Self {
            data,
            format: ImageFormat::Png,
            metadata,
            payload: payload.to_string(),
        })
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL carrying the payload as received.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"short"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_data_uri_split() {
        let image = SourceImage::from_data_uri("data:image/jpeg;base64,QQ==").unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.payload(), "QQ==");

        let image = SourceImage::from_data_uri("data:image/webp;base64,UklGRg==").unwrap();
        assert_eq!(image.mime_type(), "image/webp");
        assert_eq!(image.to_data_uri(), "data:image/webp;base64,UklGRg==");
    }

    #[test]
    fn test_data_uri_defaults_to_jpeg() {
        let bare = SourceImage::from_data_uri("QQ==").unwrap();
        assert_eq!(bare.mime_type(), DEFAULT_SOURCE_MIME);
        assert_eq!(bare.payload(), "QQ==");

        let no_mime = SourceImage::from_data_uri("data:;base64,QQ==").unwrap();
        assert_eq!(no_mime.mime_type(), DEFAULT_SOURCE_MIME);
    }

    #[test]
    fn test_data_uri_rejects_bad_payload() {
        assert!(matches!(
            SourceImage::from_data_uri("data:image/png;base64,"),
            Err(StudioError::InvalidImage(_))
        ));
        assert!(matches!(
            SourceImage::from_data_uri("data:image/png;base64,not base64!"),
            Err(StudioError::InvalidImage(_))
        ));
        assert!(SourceImage::from_data_uri("").is_err());
    }

    #[test]
    fn test_source_from_bytes_detects_format() {
        let image = SourceImage::from_bytes(&PNG_MAGIC, None).unwrap();
        assert_eq!(image.mime_type(), "image/png");

        let image = SourceImage::from_bytes(b"not an image", None).unwrap();
        assert_eq!(image.mime_type(), DEFAULT_SOURCE_MIME);

        assert!(SourceImage::from_bytes(&[], None).is_err());
    }

    #[test]
    fn test_source_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.webp");
        std::fs::write(&path, b"plain bytes").unwrap();

        let image = SourceImage::from_path(&path).unwrap();
        assert_eq!(image.mime_type(), "image/webp");
        assert_eq!(image.payload(), "cGxhaW4gYnl0ZXM=");
    }

    #[test]
    fn test_generated_data_url() {
        let image = GeneratedImage::from_base64_png("Zm9v", GenerationMetadata::default()).unwrap();
        assert_eq!(image.data, b"foo");
        assert_eq!(image.size(), 3);
        assert_eq!(image.to_data_url(), "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_generated_keeps_payload_verbatim() {
        let payload = "Zm9v\nYmFy";
        let image = GeneratedImage::from_base64_png(payload, GenerationMetadata::default()).unwrap();
        assert_eq!(image.data, b"foobar");
        assert_eq!(image.to_data_url(), "data:image/png;base64,Zm9v\nYmFy");
        assert_eq!(image.to_base64(), "Zm9vYmFy");
    }

    #[test]
    fn test_generated_rejects_bad_base64() {
        let err = GeneratedImage::from_base64_png("%%%", GenerationMetadata::default());
        assert!(matches!(err, Err(StudioError::Decode(_))));
    }
}
