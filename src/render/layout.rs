//! # Layout Planning
//!
//! Centers `N×scale` pixels of module content on a fixed canvas.
//!
//! ## Geometry
//!
//! ```text
//!            ├─ left ─┼──── content_bytes ────┼── right ──┤
//!          ┬ ░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░  top_margin_rows
//!          │ ░░░░░░░░░████████████████████▒▒▒▒░░░░░░░░░░░░░
//! content  │ ░░░░░░░░░█ N*scale bits     █▒▒▒░░░░░░░░░░░░░  ▒ = padding bits
//!          │ ░░░░░░░░░████████████████████▒▒▒▒░░░░░░░░░░░░░
//!          ┴ ░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░  bottom_margin_rows
//! ```
//!
//! Horizontal margins are whole bytes, so content always starts on a byte
//! boundary. The few padding bits after the last module complete its byte.
//!
//! ## Vertical Split
//!
//! The top margin always gets the larger share. How much larger is chosen
//! by [`MarginPolicy`]:
//!
//! | Policy | Bottom rows | 28 spare rows → top/bottom |
//! |--------|-------------|----------------------------|
//! | `HalfLessOne` | `max(vm/2 - 1, 0)` | 15 / 13 |
//! | `Third` | `vm/3` | 19 / 9 |
//!
//! ## Example
//!
//! ```
//! use monoqr::display::DisplayConfig;
//! use monoqr::render::layout::{plan, MarginPolicy};
//!
//! let layout = plan(DisplayConfig::EV3_LCD.canvas(), 25, 4, MarginPolicy::HalfLessOne).unwrap();
//! assert_eq!(layout.content_px, 100);
//! assert_eq!(layout.content_bytes, 13);
//! assert_eq!(layout.left_margin_bytes + layout.right_margin_bytes, 11);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::CanvasSpec;
use crate::error::LayoutError;

/// Rule for splitting spare rows between the top and bottom margins.
///
/// Both rules give the top margin at least as many rows as the bottom;
/// the top of the target display sits in more shadow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginPolicy {
    /// Bottom gets one row less than half, top gets the rest.
    #[default]
    HalfLessOne,
    /// Bottom gets a third, top gets the rest.
    Third,
}

impl MarginPolicy {
    /// Rows below the content for `vertical_margin` spare rows.
    pub fn bottom_rows(self, vertical_margin: u32) -> u32 {
        match self {
            Self::HalfLessOne => (vertical_margin / 2).saturating_sub(1),
            Self::Third => vertical_margin / 3,
        }
    }

    /// Split `vertical_margin` into `(top, bottom)`.
    pub fn split(self, vertical_margin: u32) -> (u32, u32) {
        let bottom = self.bottom_rows(vertical_margin);
        (vertical_margin - bottom, bottom)
    }
}

/// Margins and padding for one render request.
///
/// Computed once by [`plan`] and never mutated. The fields are public for
/// reading; [`Layout::validate`] catches a layout edited by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub canvas: CanvasSpec,
    /// Modules per matrix side (`N`)
    pub module_count: u32,
    /// Physical pixels per module edge
    pub scale: u32,
    /// `N * scale`
    pub content_px: u32,
    /// `ceil(content_px / 8)`, padding included
    pub content_bytes: u32,
    pub vertical_margin: u32,
    pub top_margin_rows: u32,
    pub bottom_margin_rows: u32,
    /// Zero bits after the last module bit, in `0..=7`
    pub row_buffer_padding_bits: u32,
    pub horizontal_margin_bytes: u32,
    pub left_margin_bytes: u32,
    pub right_margin_bytes: u32,
    pub margin_policy: MarginPolicy,
}

impl Layout {
    /// Bytes per physical row.
    #[inline]
    pub fn row_stride_bytes(&self) -> usize {
        self.canvas.row_stride_bytes as usize
    }

    /// Physical rows in the assembled buffer.
    #[inline]
    pub fn height_px(&self) -> usize {
        self.canvas.height_px as usize
    }

    /// Bits in one content row, padding included.
    #[inline]
    pub fn content_bits(&self) -> usize {
        (self.content_px + self.row_buffer_padding_bits) as usize
    }

    /// Check that every field is what [`plan`] gives for this layout's
    /// canvas, module count, scale and policy.
    ///
    /// Errors from planning itself (for example a `scale` of 0) are
    /// returned as they are; any other difference is
    /// [`LayoutError::Inconsistent`].
    pub fn validate(&self) -> Result<(), LayoutError> {
        let expected = compute(self.canvas, self.module_count, self.scale, self.margin_policy)?;
        if expected != *self {
            return Err(LayoutError::Inconsistent);
        }
        Ok(())
    }
}

/// Plan the layout of an `module_count`×`module_count` matrix scaled by
/// `scale` on `canvas`.
///
/// Content is centered in the row stride; the whole of it, left margin
/// included, must still end within `width_px`.
///
/// ## Errors
///
/// - [`LayoutError::EmptyMatrix`] if `module_count` is 0
/// - [`LayoutError::ZeroScale`] if `scale` is 0
/// - [`LayoutError::StrideTooNarrow`] if the canvas stride cannot hold its width
/// - [`LayoutError::CanvasTooSmall`] if the scaled content needs more rows
///   than the canvas has, or its centered position runs past `width_px`
pub fn plan(
    canvas: CanvasSpec,
    module_count: u32,
    scale: u32,
    margin_policy: MarginPolicy,
) -> Result<Layout, LayoutError> {
    let layout = compute(canvas, module_count, scale, margin_policy)?;

    debug!(
        module_count,
        scale,
        content_px = layout.content_px,
        top = layout.top_margin_rows,
        bottom = layout.bottom_margin_rows,
        left = layout.left_margin_bytes,
        right = layout.right_margin_bytes,
        padding_bits = layout.row_buffer_padding_bits,
        "planned layout"
    );

    Ok(layout)
}

fn compute(
    canvas: CanvasSpec,
    module_count: u32,
    scale: u32,
    margin_policy: MarginPolicy,
) -> Result<Layout, LayoutError> {
    if module_count == 0 {
        return Err(LayoutError::EmptyMatrix);
    }
    if scale == 0 {
        return Err(LayoutError::ZeroScale);
    }
    canvas.validate()?;

    let required_px = module_count as u64 * scale as u64;
    let too_small = |required_width_px: u64| LayoutError::CanvasTooSmall {
        required_rows: required_px,
        available_rows: canvas.height_px,
        required_width_px,
        available_width_px: canvas.width_px,
    };
    if required_px > canvas.height_px as u64 || required_px > canvas.width_px as u64 {
        return Err(too_small(required_px));
    }

    // Bounded by height_px, so it fits in u32. Fitting width_px also means
    // content_bytes <= row_stride_bytes.
    let content_px = required_px as u32;
    let content_bytes = content_px.div_ceil(8);

    let vertical_margin = canvas.height_px - content_px;
    let (top_margin_rows, bottom_margin_rows) = margin_policy.split(vertical_margin);

    let row_buffer_padding_bits = (8 - content_px % 8) % 8;

    let horizontal_margin_bytes = canvas.row_stride_bytes - content_bytes;
    let left_margin_bytes = horizontal_margin_bytes / 2;
    let right_margin_bytes = horizontal_margin_bytes - left_margin_bytes;

    // Bits past width_px are never shown and must stay zero
    let content_end_px = left_margin_bytes as u64 * 8 + content_px as u64;
    if content_end_px > canvas.width_px as u64 {
        return Err(too_small(content_end_px));
    }

    Ok(Layout {
        canvas,
        module_count,
        scale,
        content_px,
        content_bytes,
        vertical_margin,
        top_margin_rows,
        bottom_margin_rows,
        row_buffer_padding_bits,
        horizontal_margin_bytes,
        left_margin_bytes,
        right_margin_bytes,
        margin_policy,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayConfig;

    fn ev3() -> CanvasSpec {
        DisplayConfig::EV3_LCD.canvas()
    }

    #[test]
    fn test_ev3_scale_4() {
        let layout = plan(ev3(), 25, 4, MarginPolicy::HalfLessOne).unwrap();
        assert_eq!(layout.content_px, 100);
        assert_eq!(layout.vertical_margin, 28);
        assert_eq!(layout.top_margin_rows, 15);
        assert_eq!(layout.bottom_margin_rows, 13);
        assert_eq!(layout.row_buffer_padding_bits, 4);
        assert_eq!(layout.content_bytes, 13);
        assert_eq!(layout.horizontal_margin_bytes, 11);
        assert_eq!(layout.left_margin_bytes, 5);
        assert_eq!(layout.right_margin_bytes, 6);
        assert_eq!(layout.content_bits(), 104);
    }

    #[test]
    fn test_ev3_scale_5() {
        // 25 * 5 = 125 px: three padding bits round it up to 16 bytes
        let layout = plan(ev3(), 25, 5, MarginPolicy::Third).unwrap();
        assert_eq!(layout.content_px, 125);
        assert_eq!(layout.row_buffer_padding_bits, 3);
        assert_eq!(layout.content_bytes, 16);
        assert_eq!(layout.vertical_margin, 3);
        assert_eq!(layout.top_margin_rows, 2);
        assert_eq!(layout.bottom_margin_rows, 1);
        assert_eq!(layout.left_margin_bytes, 4);
        assert_eq!(layout.right_margin_bytes, 4);
    }

    #[test]
    fn test_third_policy_split() {
        assert_eq!(MarginPolicy::Third.split(28), (19, 9));
        assert_eq!(MarginPolicy::Third.split(0), (0, 0));
        assert_eq!(MarginPolicy::Third.split(2), (2, 0));
    }

    #[test]
    fn test_half_less_one_small_margins() {
        assert_eq!(MarginPolicy::HalfLessOne.split(0), (0, 0));
        assert_eq!(MarginPolicy::HalfLessOne.split(1), (1, 0));
        assert_eq!(MarginPolicy::HalfLessOne.split(2), (2, 0));
        assert_eq!(MarginPolicy::HalfLessOne.split(5), (4, 1));
    }

    #[test]
    fn test_invariants_hold_across_sizes() {
        let canvases = [
            ev3(),
            CanvasSpec::packed(64, 64),
            CanvasSpec::new(60, 61, 9).unwrap(),
            CanvasSpec::packed(1, 1),
        ];
        for canvas in canvases {
            for policy in [MarginPolicy::HalfLessOne, MarginPolicy::Third] {
                for n in 1..=41 {
                    for scale in 1..=8 {
                        let Ok(layout) = plan(canvas, n, scale, policy) else {
                            continue;
                        };
                        assert_eq!(
                            layout.left_margin_bytes
                                + layout.content_bytes
                                + layout.right_margin_bytes,
                            canvas.row_stride_bytes
                        );
                        assert_eq!(
                            layout.top_margin_rows + layout.bottom_margin_rows + n * scale,
                            canvas.height_px
                        );
                        assert!(layout.top_margin_rows >= layout.bottom_margin_rows);
                        assert!(layout.left_margin_bytes <= layout.right_margin_bytes);
                        assert!(
                            layout.left_margin_bytes * 8 + layout.content_px <= canvas.width_px
                        );
                        assert!(layout.validate().is_ok());
                        assert!(layout.row_buffer_padding_bits < 8);
                        assert_eq!(layout.content_bits() % 8, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_content_exactly_fills_canvas() {
        let layout = plan(CanvasSpec::packed(16, 16), 16, 1, MarginPolicy::HalfLessOne).unwrap();
        assert_eq!(layout.vertical_margin, 0);
        assert_eq!(layout.horizontal_margin_bytes, 0);
        assert_eq!(layout.row_buffer_padding_bits, 0);
    }

    #[test]
    fn test_too_tall() {
        let err = plan(ev3(), 25, 6, MarginPolicy::HalfLessOne).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CanvasTooSmall {
                required_rows: 150,
                available_rows: 128,
                required_width_px: 150,
                available_width_px: 178,
            }
        );
    }

    #[test]
    fn test_too_wide() {
        // 20 rows is plenty, 16 px per row is not
        let canvas = CanvasSpec::new(16, 20, 2).unwrap();
        let err = plan(canvas, 17, 1, MarginPolicy::Third).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::CanvasTooSmall {
                required_width_px: 17,
                available_width_px: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_wide_stride_content_past_width() {
        // 20 px visible in a 64-bit stride: centering puts 20 px of content
        // at byte 2, ending at pixel 36
        let canvas = CanvasSpec::new(20, 20, 8).unwrap();
        assert_eq!(
            plan(canvas, 20, 1, MarginPolicy::HalfLessOne),
            Err(LayoutError::CanvasTooSmall {
                required_rows: 20,
                available_rows: 20,
                required_width_px: 36,
                available_width_px: 20,
            })
        );
    }

    #[test]
    fn test_wide_stride_small_content_fits() {
        // 4 px of content: h = 7, left = 3 bytes, ends at pixel 28 < 40
        let canvas = CanvasSpec::new(40, 10, 8).unwrap();
        let layout = plan(canvas, 4, 1, MarginPolicy::Third).unwrap();
        assert_eq!(layout.left_margin_bytes, 3);
        assert_eq!(layout.right_margin_bytes, 4);
        assert!(layout.left_margin_bytes * 8 + layout.content_px <= canvas.width_px);
    }

    #[test]
    fn test_validate_accepts_planned_layout() {
        let layout = plan(ev3(), 25, 4, MarginPolicy::HalfLessOne).unwrap();
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_edited_layout() {
        let planned = plan(ev3(), 25, 4, MarginPolicy::HalfLessOne).unwrap();

        let mut taller_top = planned;
        taller_top.top_margin_rows += 3;
        assert_eq!(taller_top.validate(), Err(LayoutError::Inconsistent));

        let mut shifted = planned;
        shifted.left_margin_bytes += 1;
        shifted.right_margin_bytes -= 1;
        assert_eq!(shifted.validate(), Err(LayoutError::Inconsistent));

        let mut zero_scale = planned;
        zero_scale.scale = 0;
        assert_eq!(zero_scale.validate(), Err(LayoutError::ZeroScale));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(plan(ev3(), 0, 4, MarginPolicy::Third), Err(LayoutError::EmptyMatrix));
        assert_eq!(plan(ev3(), 25, 0, MarginPolicy::Third), Err(LayoutError::ZeroScale));
    }

    #[test]
    fn test_overflowing_scale_is_too_small() {
        let err = plan(ev3(), u32::MAX, u32::MAX, MarginPolicy::Third).unwrap_err();
        assert!(matches!(err, LayoutError::CanvasTooSmall { .. }));
    }

    #[test]
    fn test_narrow_stride_rejected() {
        let canvas = CanvasSpec {
            width_px: 100,
            height_px: 100,
            row_stride_bytes: 10,
        };
        assert!(matches!(
            plan(canvas, 5, 1, MarginPolicy::Third),
            Err(LayoutError::StrideTooNarrow { .. })
        ));
    }
}
