//! Error types.
//!
//! Rendering itself is infallible once a [`ModuleMatrix`](crate::matrix::ModuleMatrix)
//! exists: unknown glyph ids fall back to built-in shapes and a bad logo is
//! dropped. What can fail is producing the matrix, loading configuration, and
//! exporting.

use thiserror::Error;

/// Errors produced while obtaining a module matrix.
#[derive(Debug, Clone, Error)]
pub enum MatrixError {
    /// The encoder could not fit the payload into any symbol version.
    #[error("QR encoding failed: {0}")]
    Encode(String),

    /// The grid is not a valid QR symbol size (21, 25, ..., 177).
    #[error("invalid symbol size {0}: expected 21..=177 in steps of 4")]
    InvalidSize(usize),

    /// The module buffer does not hold `size * size` cells.
    #[error("module buffer holds {actual} cells, a {size}x{size} symbol needs {expected}")]
    NotSquare {
        size: usize,
        expected: usize,
        actual: usize,
    },
}

/// Reasons a logo is rejected before any encoding starts.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error("logo is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("logo could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// Configuration and style loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color {0:?}: expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("invalid data URI")]
    InvalidDataUri,

    #[error("unknown {kind} {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Failures local to a single export attempt.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not build the render tree: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("conversion request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("conversion service answered with HTTP {0}")]
    RemoteStatus(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("another export is already in progress")]
    Busy,

    #[error("export worker panicked")]
    WorkerPanicked,
}

impl ExportError {
    /// The single message shown to the user when an export fails.
    pub fn user_message(&self) -> String {
        format!("Download failed: {}", self)
    }
}

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_wraps_cause() {
        let err = ExportError::RemoteStatus(500);
        assert_eq!(
            err.user_message(),
            "Download failed: conversion service answered with HTTP 500"
        );
    }

    #[test]
    fn test_matrix_error_converts_into_crate_error() {
        let err: Error = MatrixError::InvalidSize(22).into();
        assert!(err.to_string().contains("22"));
    }
}
