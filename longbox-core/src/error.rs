//! Error types for Longbox Core

use thiserror::Error;

/// Result type alias using LongboxError
pub type Result<T> = std::result::Result<T, LongboxError>;

/// Top-level error type for all Longbox operations
#[derive(Debug, Error)]
pub enum LongboxError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while decoding a metadata sidecar file
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unknown metadata source: {0}")]
    UnknownSource(String),

    #[error("Unsupported sidecar file: {0}")]
    UnsupportedSidecar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while encoding a metadata sidecar file
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("XML writing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON writing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while reading or repacking a comic archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Not a comic archive: {0}")]
    NotAnArchive(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
