//! Accepted image formats for open and drop.

use std::path::Path;

use crate::error::{CrossPrintError, Result};

/// Lower-case extensions the editor accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/bmp",
    "image/x-ms-bmp",
];

pub fn has_supported_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

pub fn is_supported_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    SUPPORTED_MIME_TYPES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(essence))
}

/// A file is accepted if either its MIME type or its extension matches.
pub fn is_supported(name: &str, mime: Option<&str>) -> bool {
    mime.is_some_and(is_supported_mime) || has_supported_extension(name)
}

pub fn ensure_supported(name: &str, mime: Option<&str>) -> Result<()> {
    if is_supported(name, mime) {
        Ok(())
    } else {
        Err(CrossPrintError::UnsupportedFileType(name.to_string()))
    }
}
