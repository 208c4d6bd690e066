use std::fmt;

use thiserror::Error;

use crate::image::ImageId;

#[derive(Error, Debug)]
pub enum CrossPrintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unknown image id {0}")]
    UnknownImage(ImageId),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Degenerate corner configuration; cannot estimate homography")]
    DegenerateQuad,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("{op} failed: {message}")]
    ServiceCall { op: ServiceOp, message: String },

    #[error("Image bridge has shut down")]
    BridgeClosed,

    #[error("Config error: {0}")]
    Config(String),
}

impl CrossPrintError {
    /// Wrap an error with the name of the service operation that produced it.
    pub fn in_op(self, op: ServiceOp) -> Self {
        match self {
            wrapped @ Self::ServiceCall { .. } => wrapped,
            other => Self::ServiceCall {
                op,
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, CrossPrintError>;

/// Image service operations, named as they appear on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceOp {
    LoadImage,
    LoadImageFromBytes,
    GetPreviewPng,
    ApplyHomography,
    ApplyCrop,
    ApplyThreshold,
    ExportImage,
    /// Decoding the PNG returned by `get_preview_png`.
    DecodePreview,
}

impl fmt::Display for ServiceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadImage => "load_image",
            Self::LoadImageFromBytes => "load_image_from_bytes",
            Self::GetPreviewPng => "get_preview_png",
            Self::ApplyHomography => "apply_homography",
            Self::ApplyCrop => "apply_crop",
            Self::ApplyThreshold => "apply_threshold",
            Self::ExportImage => "export_image",
            Self::DecodePreview => "decode_preview",
        };
        f.write_str(name)
    }
}
