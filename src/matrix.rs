//! # Module Matrix
//!
//! The square grid of dark/light modules handed to the compositor.
//!
//! Matrices come from a QR encoder ([`ModuleMatrix::encode`] wraps the
//! `qrcode` crate), from any boolean grid, or from a text drawing:
//!
//! ```
//! use monoqr::matrix::ModuleMatrix;
//!
//! let m = ModuleMatrix::parse("#.\n.#").unwrap();
//! assert_eq!(m.side(), 2);
//! assert!(m.get(0, 0));
//! assert!(!m.get(1, 0));
//! ```

use qrcode::{Color, EcLevel, QrCode};

use crate::error::{MonoqrError, RenderError};

/// Square boolean grid, `true` = dark module. Stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    side: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Build from rows. Every row must be as long as there are rows.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, RenderError> {
        let side = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != side) {
            return Err(RenderError::ShapeMismatch {
                expected: side,
                rows: side,
                columns: bad.len(),
            });
        }
        Ok(Self {
            side,
            modules: rows.into_iter().flatten().collect(),
        })
    }

    /// Build from a row-major slice of `side * side` modules.
    pub fn from_flat(side: usize, modules: &[bool]) -> Result<Self, RenderError> {
        if side.checked_mul(side) != Some(modules.len()) {
            return Err(RenderError::ShapeMismatch {
                expected: side,
                rows: if side == 0 { 0 } else { modules.len().div_ceil(side) },
                columns: side,
            });
        }
        Ok(Self {
            side,
            modules: modules.to_vec(),
        })
    }

    /// Parse a text drawing, one row per line.
    ///
    /// `#`, `1`, `X` and `█` are dark; every other character is light.
    /// Empty lines are skipped.
    pub fn parse(text: &str) -> Result<Self, RenderError> {
        let rows = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(|c| matches!(c, '#' | '1' | 'X' | '█')).collect())
            .collect();
        Self::from_rows(rows)
    }

    /// Copy the modules of an encoded QR symbol, without a quiet zone.
    pub fn from_qr(code: &QrCode) -> Self {
        Self {
            side: code.width(),
            modules: code.to_colors().into_iter().map(|c| c == Color::Dark).collect(),
        }
    }

    /// Encode `data` as a QR symbol at the smallest version that fits.
    ///
    /// ## Example
    ///
    /// ```
    /// use monoqr::matrix::ModuleMatrix;
    /// use qrcode::EcLevel;
    ///
    /// let m = ModuleMatrix::encode(b"hello", EcLevel::L).unwrap();
    /// assert_eq!(m.side(), 21); // version 1
    /// ```
    pub fn encode(data: &[u8], ec_level: EcLevel) -> Result<Self, MonoqrError> {
        let code = QrCode::with_error_correction_level(data, ec_level)
            .map_err(|e| MonoqrError::Encode(format!("QR code generation failed: {}", e)))?;
        Ok(Self::from_qr(&code))
    }

    /// Modules per side (`N`).
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Modules per side as the `u32` the layout planner takes. A side too
    /// large for `u32` saturates, which no canvas can hold.
    #[inline]
    pub fn module_count(&self) -> u32 {
        u32::try_from(self.side).unwrap_or(u32::MAX)
    }

    /// Whether module `(x, y)` is dark.
    ///
    /// ## Panics
    ///
    /// Panics if `x` or `y` is outside the matrix.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.side && y < self.side, "module ({}, {}) out of range", x, y);
        self.modules[y * self.side + x]
    }

    /// Modules of row `y`, left to right.
    #[inline]
    pub fn row(&self, y: usize) -> &[bool] {
        &self.modules[y * self.side..(y + 1) * self.side]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks(0) panics; an empty matrix has no rows
        self.modules.chunks(self.side.max(1))
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}
