//! # Error Types
//!
//! This module defines error types used throughout the monoqr library.
//!
//! Nothing in the compositor performs I/O, so every error here is fatal:
//! rendering the same inputs again reproduces the same error.

use thiserror::Error;

/// Errors raised while planning a layout or describing a canvas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Scaled content does not fit the canvas. `required_width_px` counts
    /// the left margin when the content itself fits but its centered
    /// position would run past `width_px`.
    #[error(
        "Canvas too small: content needs {required_rows} rows and {required_width_px} px \
         of row width, canvas has {available_rows} rows and {available_width_px} px"
    )]
    CanvasTooSmall {
        required_rows: u64,
        available_rows: u32,
        required_width_px: u64,
        available_width_px: u32,
    },

    /// A layout whose fields no longer agree with what its canvas, module
    /// count, scale and policy produce.
    #[error("Layout does not match its canvas, module count and scale")]
    Inconsistent,

    /// The module matrix has no modules.
    #[error("Module matrix is empty")]
    EmptyMatrix,

    /// Scale factor must be at least 1.
    #[error("Scale factor must be at least 1")]
    ZeroScale,

    /// The row stride cannot hold the canvas width.
    #[error("Row stride of {row_stride_bytes} bytes cannot hold {width_px} pixels")]
    StrideTooNarrow { width_px: u32, row_stride_bytes: u32 },
}

/// Errors raised by the raster packer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Layout planning failed.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The matrix is not `expected`×`expected`.
    #[error("Shape mismatch: expected {expected}x{expected} modules, got {rows} rows of {columns}")]
    ShapeMismatch {
        expected: usize,
        rows: usize,
        columns: usize,
    },
}

/// Main error type for monoqr operations
#[derive(Debug, Error)]
pub enum MonoqrError {
    /// Rendering error (layout or matrix shape)
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Layout error raised outside a render call
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// QR encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Invalid configuration or profile string
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
