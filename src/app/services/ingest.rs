//! Turning uploaded image bytes into embedded data URLs and back.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::app::infrastructure::error::{AppError, Result};

/// Guess a MIME type from the file extension.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Encode `bytes` as a `data:<mime>;base64,` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Turn an uploaded file into the data URL stored on its `Image`.
pub fn ingest_image(name: &str, bytes: &[u8]) -> String {
    to_data_url(mime_for_name(name), bytes)
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| AppError::Image("not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AppError::Image("data URL has no payload".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| AppError::Image("only base64 data URLs are supported".to_string()))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::Image(format!("invalid base64 payload: {}", e)))?;
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}
