//! # Bit Order
//!
//! Where pixel `i` of a row lands inside its byte.
//!
//! The EV3 framebuffer reads each byte least-significant bit first: the
//! leftmost pixel of a byte is bit 0.
//!
//! ```text
//! pixels:   0 1 2 3 4 5 6 7
//!           █ ░ ░ ░ ░ ░ ░ ░
//!
//! LsbFirst: 0b0000_0001 = 0x01
//! MsbFirst: 0b1000_0000 = 0x80
//! ```
//!
//! Most thermal and raster printers use `MsbFirst`.

/// Bit order within one packed byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BitOrder {
    /// Pixel `i` is bit `i % 8` (value `1 << (i % 8)`).
    #[default]
    LsbFirst,
    /// Pixel `i` is bit `7 - i % 8`.
    MsbFirst,
}

impl BitOrder {
    /// Mask selecting pixel `index` (counted from the start of the row)
    /// within its byte.
    #[inline]
    pub fn mask(self, index: usize) -> u8 {
        let bit = index % 8;
        match self {
            Self::LsbFirst => 1 << bit,
            Self::MsbFirst => 0x80 >> bit,
        }
    }

    /// Pack a bit sequence into bytes. A trailing partial byte is padded
    /// with zero bits.
    ///
    /// ## Example
    ///
    /// ```
    /// use monoqr::render::bitorder::BitOrder;
    ///
    /// let bits = [true, true, false, false, true];
    /// assert_eq!(BitOrder::LsbFirst.pack(&bits), vec![0b0001_0011]);
    /// assert_eq!(BitOrder::MsbFirst.pack(&bits), vec![0b1100_1000]);
    /// ```
    pub fn pack(self, bits: &[bool]) -> Vec<u8> {
        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                bytes[i / 8] |= self.mask(i);
            }
        }
        bytes
    }

    /// Read pixel `index` of a packed row.
    ///
    /// Returns `false` past the end of `row`.
    #[inline]
    pub fn get(self, row: &[u8], index: usize) -> bool {
        row.get(index / 8)
            .is_some_and(|&byte| byte & self.mask(index) != 0)
    }
}
