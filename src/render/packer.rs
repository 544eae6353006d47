//! # Raster Packer
//!
//! Turns a [`ModuleMatrix`] and a planned [`Layout`] into a packed 1bpp
//! framebuffer.
//!
//! ## Row Assembly
//!
//! Each module row becomes one physical row, repeated `scale` times:
//!
//! ```text
//! modules:   █ ░ █            (N = 3, scale = 3)
//! bits:      ███░░░███ + padding 0000000
//! row:       [left zeros][packed bits, 2 bytes][right zeros]   = stride bytes
//! ```
//!
//! The full buffer is top margin rows, `N * scale` content rows, then
//! bottom margin rows, all of them `stride` bytes wide.
//!
//! ## Trailing Trim
//!
//! The EV3 framebuffer contract expects the buffer one byte short: the
//! final byte is dropped after assembly. [`TrailingTrim`] keeps that step
//! separate from row assembly.
//!
//! ## Example
//!
//! ```
//! use monoqr::display::DisplayConfig;
//! use monoqr::matrix::ModuleMatrix;
//! use monoqr::render::layout::{plan, MarginPolicy};
//! use monoqr::render::packer::pack;
//!
//! let matrix = ModuleMatrix::from_rows(vec![vec![true; 25]; 25]).unwrap();
//! let layout = plan(DisplayConfig::EV3_LCD.canvas(), 25, 4, MarginPolicy::HalfLessOne).unwrap();
//! let bitmap = pack(&matrix, &layout).unwrap();
//!
//! assert_eq!(bitmap.len(), 24 * 128 - 1);
//! ```

use tracing::trace;

use super::bitmap::PackedBitmap;
use super::bitorder::BitOrder;
use super::layout::{Layout, MarginPolicy, plan};
use crate::display::CanvasSpec;
use crate::error::RenderError;
use crate::matrix::ModuleMatrix;

/// Post-processing applied to the assembled buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrailingTrim {
    /// Drop exactly the last byte, once.
    #[default]
    DropFinalByte,
    /// Return the full `stride * height` bytes.
    Keep,
}

impl TrailingTrim {
    /// Apply the trim to a fully assembled buffer.
    pub fn apply(self, buffer: &mut Vec<u8>) {
        match self {
            Self::DropFinalByte => {
                buffer.pop();
            }
            Self::Keep => {}
        }
    }
}

/// Packing policy: bit order plus trailing trim.
///
/// `Packer::default()` matches the EV3 framebuffer: LSB-first bytes, final
/// byte dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Packer {
    pub bit_order: BitOrder,
    pub trim: TrailingTrim,
}

impl Packer {
    pub fn new(bit_order: BitOrder, trim: TrailingTrim) -> Self {
        Self { bit_order, trim }
    }

    /// Pack `matrix` into a framebuffer laid out by `layout`.
    ///
    /// ## Errors
    ///
    /// - [`RenderError::Layout`] if `layout` is not what [`plan`] gives for
    ///   its own canvas, module count, scale and policy
    /// - [`RenderError::ShapeMismatch`] if the matrix side is not the
    ///   `module_count` the layout was planned for
    pub fn pack(
        &self,
        matrix: &ModuleMatrix,
        layout: &Layout,
    ) -> Result<PackedBitmap, RenderError> {
        layout.validate()?;

        let n = layout.module_count as usize;
        if matrix.side() != n {
            return Err(RenderError::ShapeMismatch {
                expected: n,
                rows: matrix.side(),
                columns: matrix.side(),
            });
        }

        let stride = layout.row_stride_bytes();
        let scale = layout.scale as usize;
        let mut buffer = Vec::with_capacity(layout.canvas.buffer_len());

        push_blank_rows(&mut buffer, stride, layout.top_margin_rows as usize);
        for modules in matrix.rows() {
            let row = self.assemble_row(modules, layout);
            debug_assert_eq!(row.len(), stride);
            for _ in 0..scale {
                buffer.extend_from_slice(&row);
            }
        }
        push_blank_rows(&mut buffer, stride, layout.bottom_margin_rows as usize);
        debug_assert_eq!(buffer.len(), layout.canvas.buffer_len());

        self.trim.apply(&mut buffer);

        trace!(bytes = buffer.len(), stride, "packed framebuffer");
        Ok(PackedBitmap::new(buffer, layout.canvas, self.bit_order))
    }

    /// One physical row: left margin, scaled module bits, padding, right
    /// margin.
    fn assemble_row(&self, modules: &[bool], layout: &Layout) -> Vec<u8> {
        let scale = layout.scale as usize;

        let mut bits = Vec::with_capacity(layout.content_bits());
        for &dark in modules {
            bits.extend(std::iter::repeat_n(dark, scale));
        }
        bits.resize(layout.content_bits(), false);

        let mut row = Vec::with_capacity(layout.row_stride_bytes());
        row.resize(layout.left_margin_bytes as usize, 0);
        row.extend(self.bit_order.pack(&bits));
        row.resize(layout.row_stride_bytes(), 0);
        row
    }
}

fn push_blank_rows(buffer: &mut Vec<u8>, stride: usize, rows: usize) {
    buffer.resize(buffer.len() + stride * rows, 0);
}

/// Pack with the default EV3 policy (LSB first, final byte dropped).
pub fn pack(matrix: &ModuleMatrix, layout: &Layout) -> Result<PackedBitmap, RenderError> {
    Packer::default().pack(matrix, layout)
}

/// Plan and pack in one call, forwarding layout errors.
pub fn render(
    matrix: &ModuleMatrix,
    canvas: CanvasSpec,
    scale: u32,
    margin_policy: MarginPolicy,
) -> Result<PackedBitmap, RenderError> {
    let layout = plan(canvas, matrix.module_count(), scale, margin_policy)?;
    pack(matrix, &layout)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    fn layout(canvas: CanvasSpec, n: u32, scale: u32) -> Layout {
        plan(canvas, n, scale, MarginPolicy::HalfLessOne).unwrap()
    }

    #[test]
    fn test_trim_drops_one_byte() {
        let mut buf = vec![1, 2, 3];
        TrailingTrim::DropFinalByte.apply(&mut buf);
        assert_eq!(buf, vec![1, 2]);

        let mut buf = vec![1, 2, 3];
        TrailingTrim::Keep.apply(&mut buf);
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_single_module_scale_1() {
        // 1 module on an 8x1 canvas: one row, one byte, trimmed away
        let matrix = ModuleMatrix::parse("#").unwrap();
        let layout = layout(CanvasSpec::packed(8, 1), 1, 1);
        let keep = Packer::new(BitOrder::LsbFirst, TrailingTrim::Keep);
        assert_eq!(keep.pack(&matrix, &layout).unwrap().as_bytes(), &[0x01]);
        assert!(pack(&matrix, &layout).unwrap().is_empty());
    }

    #[test]
    fn test_horizontal_scaling() {
        // "#.#" at scale 3 → bits 111000111 + 7 padding
        let matrix = ModuleMatrix::parse("#.#\n...\n...").unwrap();
        let layout = layout(CanvasSpec::packed(16, 9), 3, 3);
        let keep = Packer::new(BitOrder::LsbFirst, TrailingTrim::Keep);
        let bmp = keep.pack(&matrix, &layout).unwrap();
        assert_eq!(bmp.row(0), &[0b1100_0111, 0b0000_0001]);
        assert_eq!(bmp.row(2), bmp.row(0));
        assert_eq!(bmp.row(3), &[0, 0]);
    }

    #[test]
    fn test_msb_first_row() {
        let matrix = ModuleMatrix::parse("#.#\n...\n...").unwrap();
        let layout = layout(CanvasSpec::packed(16, 9), 3, 3);
        let keep = Packer::new(BitOrder::MsbFirst, TrailingTrim::Keep);
        let bmp = keep.pack(&matrix, &layout).unwrap();
        assert_eq!(bmp.row(0), &[0b1110_0011, 0b1000_0000]);
        assert!(bmp.pixel(8, 0));
        assert!(!bmp.pixel(9, 0));
    }

    #[test]
    fn test_margins_are_zero() {
        let matrix = ModuleMatrix::from_rows(vec![vec![true; 2]; 2]).unwrap();
        // stride 5: 1 content byte, left 2, right 2; 10 rows: 2 content
        let canvas = CanvasSpec::new(40, 10, 5).unwrap();
        let layout = layout(canvas, 2, 1);
        assert_eq!(layout.top_margin_rows, 5);
        assert_eq!(layout.bottom_margin_rows, 3);

        let bmp = Packer::new(BitOrder::LsbFirst, TrailingTrim::Keep)
            .pack(&matrix, &layout)
            .unwrap();
        for y in 0..10 {
            let expected: &[u8] = if (5..7).contains(&y) {
                &[0, 0, 0b11, 0, 0]
            } else {
                &[0; 5]
            };
            assert_eq!(bmp.row(y), expected, "row {}", y);
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let matrix = ModuleMatrix::from_rows(vec![vec![false; 21]; 21]).unwrap();
        let layout = layout(CanvasSpec::packed(178, 128), 25, 4);
        assert_eq!(
            pack(&matrix, &layout).unwrap_err(),
            RenderError::ShapeMismatch {
                expected: 25,
                rows: 21,
                columns: 21,
            }
        );
    }

    #[test]
    fn test_render_forwards_layout_error() {
        let matrix = ModuleMatrix::from_rows(vec![vec![false; 25]; 25]).unwrap();
        let err = render(&matrix, CanvasSpec::packed(178, 128), 6, MarginPolicy::Third)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::CanvasTooSmall { .. })
        ));

        let empty = ModuleMatrix::from_rows(Vec::new()).unwrap();
        assert_eq!(
            render(&empty, CanvasSpec::packed(8, 8), 1, MarginPolicy::Third).unwrap_err(),
            RenderError::Layout(LayoutError::EmptyMatrix)
        );
    }

    #[test]
    fn test_edited_layout_is_rejected() {
        let matrix = ModuleMatrix::from_rows(vec![vec![true; 4]; 4]).unwrap();
        let planned = layout(CanvasSpec::packed(16, 8), 4, 1);

        let mut taller_top = planned;
        taller_top.top_margin_rows += 3;
        assert_eq!(
            pack(&matrix, &taller_top).unwrap_err(),
            RenderError::Layout(LayoutError::Inconsistent)
        );

        let mut wider_content = planned;
        wider_content.content_bytes += 1;
        assert_eq!(
            pack(&matrix, &wider_content).unwrap_err(),
            RenderError::Layout(LayoutError::Inconsistent)
        );

        let mut zero_scale = planned;
        zero_scale.scale = 0;
        assert_eq!(
            pack(&matrix, &zero_scale).unwrap_err(),
            RenderError::Layout(LayoutError::ZeroScale)
        );
    }

    #[test]
    fn test_wide_stride_rejected_before_packing() {
        // 20 px visible in an 8-byte stride: centered content would end at pixel 36
        let matrix = ModuleMatrix::from_rows(vec![vec![true; 20]; 20]).unwrap();
        let canvas = CanvasSpec::new(20, 20, 8).unwrap();
        assert!(matches!(
            render(&matrix, canvas, 1, MarginPolicy::HalfLessOne),
            Err(RenderError::Layout(LayoutError::CanvasTooSmall {
                required_width_px: 36,
                ..
            }))
        ));
    }

    #[test]
    fn test_bitmap_carries_geometry() {
        let matrix = ModuleMatrix::from_rows(vec![vec![false; 4]; 4]).unwrap();
        let canvas = CanvasSpec::new(20, 8, 3).unwrap();
        let bmp = render(&matrix, canvas, 2, MarginPolicy::HalfLessOne).unwrap();
        assert_eq!(bmp.canvas(), canvas);
        assert_eq!(bmp.bit_order(), BitOrder::LsbFirst);
        assert_eq!(bmp.len(), 3 * 8 - 1);
    }
}
