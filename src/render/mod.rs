//! # Rendering Module
//!
//! The raster compositor: layout planning and bit packing.
//!
//! ## Modules
//!
//! - [`layout`]: Margin and padding planning for a canvas
//! - [`packer`]: Matrix to packed framebuffer
//! - [`bitorder`]: Bit order within a packed byte
//! - [`bitmap`]: The packed output buffer
//!
//! ## Usage Example
//!
//! ```
//! use monoqr::display::DisplayConfig;
//! use monoqr::matrix::ModuleMatrix;
//! use monoqr::render::{self, MarginPolicy};
//!
//! let matrix = ModuleMatrix::encode(b"Skne66[bbBj2Ss#qjW/", qrcode::EcLevel::L).unwrap();
//! let canvas = DisplayConfig::EV3_LCD.canvas();
//! let bitmap = render::render(&matrix, canvas, 4, MarginPolicy::HalfLessOne).unwrap();
//!
//! // bitmap.as_bytes() is ready for the framebuffer
//! assert_eq!(bitmap.stride(), 24);
//! ```

pub mod bitmap;
pub mod bitorder;
pub mod layout;
pub mod packer;

pub use bitmap::PackedBitmap;
pub use bitorder::BitOrder;
pub use layout::{Layout, MarginPolicy, plan};
pub use packer::{Packer, TrailingTrim, pack, render};
