//! # monoqr - QR Codes on 1-bit Framebuffers
//!
//! monoqr renders a QR module matrix onto a fixed-size monochrome
//! framebuffer, scaled and centered, packed exactly the way the display
//! expects it. It provides:
//!
//! - **Layout planning**: margins, padding, and fit checks for a canvas
//! - **Raster packing**: scaled module rows packed at the display's stride
//!   and bit order
//! - **Matrix input**: module matrices from the `qrcode` crate, boolean
//!   grids, or text drawings
//! - **Preview**: PNG rendering of a packed framebuffer
//!
//! ## Quick Start
//!
//! ```
//! use monoqr::{
//!     display::DisplayConfig,
//!     matrix::ModuleMatrix,
//!     render::{self, MarginPolicy},
//! };
//!
//! // Encode the secret (25x25 modules)
//! let matrix = ModuleMatrix::encode(b"Skne66[bbBj2Ss#qjW/", qrcode::EcLevel::L)?;
//!
//! // Plan the layout on the EV3 LCD
//! let canvas = DisplayConfig::EV3_LCD.canvas();
//! let layout = render::plan(canvas, matrix.side() as u32, 4, MarginPolicy::HalfLessOne)?;
//!
//! // Pack into framebuffer bytes
//! let bitmap = render::pack(&matrix, &layout)?;
//! assert_eq!(bitmap.len(), 24 * 128 - 1);
//!
//! # Ok::<(), monoqr::error::MonoqrError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Layout planning and bit packing |
//! | [`matrix`] | Module matrix input |
//! | [`display`] | Display geometry and render configuration |
//! | [`preview`] | PNG preview of packed framebuffers |
//! | [`error`] | Error types |
//!
//! ## Supported Displays
//!
//! - EV3 brick LCD (178×128, 24-byte stride, LSB-first)
//!
//! Any other 1bpp framebuffer works through a `canvas:WxH/STRIDE` profile.

pub mod display;
pub mod error;
pub mod matrix;
pub mod preview;
pub mod render;

// Re-exports for convenience
pub use display::{CanvasSpec, DisplayConfig};
pub use error::{LayoutError, MonoqrError, RenderError};
pub use matrix::ModuleMatrix;
pub use render::{Layout, MarginPolicy, PackedBitmap};
