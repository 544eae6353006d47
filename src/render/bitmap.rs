//! # Packed Bitmap
//!
//! The compositor's output: an owned 1bpp byte buffer plus the geometry
//! needed to read it back.

use super::bitorder::BitOrder;
use crate::display::CanvasSpec;

/// A row-major, byte-packed monochrome bitmap.
///
/// The buffer owns its bytes; nothing the caller does to the inputs of a
/// render can change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    data: Vec<u8>,
    canvas: CanvasSpec,
    bit_order: BitOrder,
}

impl PackedBitmap {
    pub(crate) fn new(data: Vec<u8>, canvas: CanvasSpec, bit_order: BitOrder) -> Self {
        Self {
            data,
            canvas,
            bit_order,
        }
    }

    /// Packed bytes, ready for the display.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the packed bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.canvas.row_stride_bytes as usize
    }

    #[inline]
    pub fn width_px(&self) -> u32 {
        self.canvas.width_px
    }

    #[inline]
    pub fn height_px(&self) -> u32 {
        self.canvas.height_px
    }

    #[inline]
    pub fn canvas(&self) -> CanvasSpec {
        self.canvas
    }

    #[inline]
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Bytes of row `y`. The last row may be shorter than the stride when
    /// the buffer was trimmed.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = (y * self.stride()).min(self.data.len());
        let end = (start + self.stride()).min(self.data.len());
        &self.data[start..end]
    }

    /// Whether pixel `(x, y)` is dark. Pixels missing from a trimmed buffer
    /// read as light.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_order.get(self.row(y), x)
    }
}

impl AsRef<[u8]> for PackedBitmap {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<PackedBitmap> for Vec<u8> {
    fn from(bitmap: PackedBitmap) -> Self {
        bitmap.data
    }
}
