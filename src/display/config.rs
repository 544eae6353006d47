//! # Display Configuration
//!
//! This module defines the geometry of supported monochrome framebuffers.
//!
//! ## Supported Displays
//!
//! | Model | Width (px) | Height (px) | Stride (bytes) |
//! |-------|------------|-------------|----------------|
//! | EV3 LCD | 178 | 128 | 24 |
//!
//! ## Usage
//!
//! ```
//! use monoqr::display::DisplayConfig;
//!
//! let config = DisplayConfig::EV3_LCD;
//! println!("Framebuffer: {}x{} px, {} bytes per row",
//!          config.width_px,
//!          config.height_px,
//!          config.row_stride_bytes);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, MonoqrError};
use crate::render::layout::MarginPolicy;

/// # Canvas Geometry
///
/// Physical bit-buffer geometry of a 1bpp framebuffer.
///
/// ```text
/// ├──────────── row_stride_bytes * 8 bits ────────────┤
/// ├──────────── width_px ─────────────┼── always 0 ───┤
/// ```
///
/// `row_stride_bytes * 8 >= width_px` must hold; use [`CanvasSpec::new`]
/// to have it checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Visible width in pixels
    pub width_px: u32,

    /// Height in pixels (physical rows)
    pub height_px: u32,

    /// Bytes per physical row
    pub row_stride_bytes: u32,
}

impl CanvasSpec {
    /// Create a canvas, checking that the stride can hold the width.
    ///
    /// ## Example
    ///
    /// ```
    /// use monoqr::display::CanvasSpec;
    ///
    /// assert!(CanvasSpec::new(178, 128, 24).is_ok());
    /// assert!(CanvasSpec::new(178, 128, 22).is_err()); // 176 bits < 178 px
    /// ```
    pub fn new(width_px: u32, height_px: u32, row_stride_bytes: u32) -> Result<Self, LayoutError> {
        let canvas = Self {
            width_px,
            height_px,
            row_stride_bytes,
        };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Canvas whose stride is the smallest that holds `width_px`.
    pub fn packed(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            row_stride_bytes: width_px.div_ceil(8),
        }
    }

    /// Check the stride invariant.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if (self.row_stride_bytes as u64) * 8 < self.width_px as u64 {
            return Err(LayoutError::StrideTooNarrow {
                width_px: self.width_px,
                row_stride_bytes: self.row_stride_bytes,
            });
        }
        Ok(())
    }

    /// Total framebuffer size in bytes before any trim.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.row_stride_bytes as usize * self.height_px as usize
    }
}

/// # Display Configuration
///
/// Hardware characteristics of a monochrome display.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Display model name
    pub name: &'static str,

    /// Visible width in pixels
    pub width_px: u32,

    /// Height in pixels
    pub height_px: u32,

    /// Bytes per framebuffer row
    pub row_stride_bytes: u32,
}

impl DisplayConfig {
    /// # EV3 Brick LCD
    ///
    /// 178×128 monochrome LCD. The framebuffer uses 24 bytes per row, so the
    /// last 14 bits of every row are never shown.
    ///
    /// ```text
    /// ├────────── 178 px visible ──────────┼─ 14 ─┤
    /// │              24 bytes              │      │
    /// ```
    pub const EV3_LCD: Self = Self {
        name: "EV3 LCD",
        width_px: 178,
        height_px: 128,
        row_stride_bytes: 24,
    };

    /// Canvas geometry of this display.
    #[inline]
    pub fn canvas(&self) -> CanvasSpec {
        CanvasSpec {
            width_px: self.width_px,
            height_px: self.height_px,
            row_stride_bytes: self.row_stride_bytes,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::EV3_LCD
    }
}

// ============================================================================
// DISPLAY PROFILE
// ============================================================================

/// A display profile describing the render target: either a known LCD or
/// an arbitrary virtual canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayProfile {
    /// A physical display with a fixed framebuffer stride.
    Lcd {
        /// Human-readable name (e.g. "EV3 LCD").
        name: String,
        width: u32,
        height: u32,
        /// Bytes per framebuffer row.
        stride: u32,
    },
    /// A virtual canvas. Stride is the tightest fit for `width` unless given.
    Canvas {
        /// Human-readable name (e.g. "Canvas 64x64").
        name: String,
        width: u32,
        height: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stride: Option<u32>,
    },
}

impl DisplayProfile {
    /// The built-in EV3 LCD profile.
    pub fn ev3() -> Self {
        let config = DisplayConfig::EV3_LCD;
        Self::Lcd {
            name: config.name.to_string(),
            width: config.width_px,
            height: config.height_px,
            stride: config.row_stride_bytes,
        }
    }

    /// A virtual canvas profile.
    pub fn canvas(width: u32, height: u32, stride: Option<u32>) -> Self {
        let name = match stride {
            Some(s) => format!("Canvas {}x{}/{}", width, height, s),
            None => format!("Canvas {}x{}", width, height),
        };
        Self::Canvas {
            name,
            width,
            height,
            stride,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        match self {
            Self::Lcd { name, .. } => name,
            Self::Canvas { name, .. } => name,
        }
    }

    /// Canvas geometry, with the stride invariant checked.
    pub fn canvas_spec(&self) -> Result<CanvasSpec, LayoutError> {
        match self {
            Self::Lcd {
                width,
                height,
                stride,
                ..
            } => CanvasSpec::new(*width, *height, *stride),
            Self::Canvas {
                width,
                height,
                stride: Some(stride),
                ..
            } => CanvasSpec::new(*width, *height, *stride),
            Self::Canvas {
                width,
                height,
                stride: None,
                ..
            } => Ok(CanvasSpec::packed(*width, *height)),
        }
    }

    /// Parse a profile string (CLI args or display name).
    ///
    /// Formats:
    /// - `"ev3"` → built-in EV3 LCD
    /// - `"canvas:WIDTHxHEIGHT"` → virtual canvas with the tightest stride
    /// - `"canvas:WIDTHxHEIGHT/STRIDE"` → virtual canvas with an explicit stride
    /// - Any built-in profile's display name (e.g. `"EV3 LCD"`)
    pub fn parse(s: &str) -> Result<Self, String> {
        if let Some(profile) = Self::built_in().into_iter().find(|p| p.name() == s) {
            return Ok(profile);
        }

        match s.to_lowercase().as_str() {
            "ev3" => Ok(Self::ev3()),
            other if other.starts_with("canvas:") => {
                let spec = &other["canvas:".len()..];
                let (dims, stride) = match spec.split_once('/') {
                    Some((dims, stride)) => {
                        let stride: u32 = stride
                            .parse()
                            .map_err(|_| format!("Invalid stride: {}", stride))?;
                        (dims, Some(stride))
                    }
                    None => (spec, None),
                };
                let (w, h) = dims
                    .split_once('x')
                    .ok_or_else(|| {
                        format!("Invalid canvas size '{}', expected WIDTHxHEIGHT", dims)
                    })?;
                let width: u32 = w.parse().map_err(|_| format!("Invalid width: {}", w))?;
                let height: u32 = h.parse().map_err(|_| format!("Invalid height: {}", h))?;
                Ok(Self::canvas(width, height, stride))
            }
            _ => Err(format!(
                "Unknown profile '{}'. Use 'ev3' or 'canvas:WIDTHxHEIGHT[/STRIDE]'",
                s
            )),
        }
    }

    /// List all built-in profiles.
    pub fn built_in() -> Vec<Self> {
        vec![Self::ev3()]
    }
}

impl Default for DisplayProfile {
    fn default() -> Self {
        Self::ev3()
    }
}

// ============================================================================
// RENDER CONFIGURATION
// ============================================================================

fn default_scale() -> u32 {
    4
}

/// Everything needed to turn a module matrix into a framebuffer, apart from
/// the matrix itself.
///
/// ## JSON Form
///
/// ```json
/// {
///   "profile": { "type": "lcd", "name": "EV3 LCD", "width": 178, "height": 128, "stride": 24 },
///   "scale": 4,
///   "margin_policy": "half_less_one"
/// }
/// ```
///
/// Every field is optional and falls back to the default shown above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub profile: DisplayProfile,

    /// Physical pixels per module edge
    #[serde(default = "default_scale")]
    pub scale: u32,

    #[serde(default)]
    pub margin_policy: MarginPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            profile: DisplayProfile::default(),
            scale: default_scale(),
            margin_policy: MarginPolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, MonoqrError> {
        serde_json::from_str(json)
            .map_err(|e| MonoqrError::Config(format!("Invalid config: {}", e)))
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, MonoqrError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

// ============================================================================
// TESTS
// ============================================================================
