//! Candidate content validation.
//!
//! Several providers answer `200 OK` with an HTML "not found" page or a JSON
//! error instead of an image, so a success status alone proves nothing. A
//! candidate counts as valid only when the payload carries a known image
//! signature, decodes, and is at least the configured size.

use image::ImageFormat;
use thiserror::Error;

use crate::fetch::FetchResponse;

/// Minimum accepted pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min_width: u32,
    pub min_height: u32,
}

/// What a validated candidate turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Why a fetched candidate is not a usable image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidContent {
    #[error("HTTP {0}")]
    HttpStatus(u32),
    #[error("empty body")]
    Empty,
    #[error("non-image content type {0:?}")]
    ContentType(String),
    #[error("leading bytes are not a known image signature")]
    Signature,
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("{width}x{height} is below the minimum size")]
    TooSmall { width: u32, height: u32 },
}

/// Identify an accepted image format from the payload's leading bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some(ImageFormat::Png);
    }
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        return Some(ImageFormat::Jpeg);
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some(ImageFormat::WebP);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    None
}

/// Content types that can never carry an image payload. A missing or
/// generic type (`application/octet-stream`) is left to signature sniffing.
fn is_non_image_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("json") || mime.contains("html") || mime.contains("xml")
}

pub fn validate_response(
    response: &FetchResponse,
    thresholds: &Thresholds,
) -> Result<ImageInfo, InvalidContent> {
    if !response.is_success() {
        return Err(InvalidContent::HttpStatus(response.status));
    }
    if response.body.is_empty() {
        return Err(InvalidContent::Empty);
    }
    if let Some(ct) = response.content_type.as_deref() {
        if is_non_image_content_type(ct) {
            return Err(InvalidContent::ContentType(ct.to_string()));
        }
    }
    validate_bytes(&response.body, thresholds)
}

/// Signature, decode and size checks on a raw payload.
pub fn validate_bytes(bytes: &[u8], thresholds: &Thresholds) -> Result<ImageInfo, InvalidContent> {
    let format = sniff_format(bytes).ok_or(InvalidContent::Signature)?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| InvalidContent::Decode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width < thresholds.min_width || height < thresholds.min_height {
        return Err(InvalidContent::TooSmall { width, height });
    }
    Ok(ImageInfo {
        format,
        width,
        height,
    })
}
