//! # PNG Preview
//!
//! Renders a [`PackedBitmap`] to a grayscale PNG so a framebuffer can be
//! checked without the display. Dark pixels are black, everything else
//! (margins, padding, the trimmed byte) is white.

use image::{GrayImage, ImageEncoder, Luma};

use crate::error::MonoqrError;
use crate::render::PackedBitmap;

/// Decode the bitmap into an 8-bit grayscale image of `width_px × height_px`.
pub fn to_image(bitmap: &PackedBitmap) -> GrayImage {
    let width = bitmap.width_px();
    let height = bitmap.height_px();
    let mut img = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let color = if bitmap.pixel(x as usize, y as usize) {
                0u8
            } else {
                255u8
            };
            img.put_pixel(x, y, Luma([color]));
        }
    }

    img
}

/// Encode the bitmap as PNG bytes.
pub fn to_png(bitmap: &PackedBitmap) -> Result<Vec<u8>, MonoqrError> {
    let img = to_image(bitmap);

    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::L8,
        )
        .map_err(|e| MonoqrError::Image(format!("Failed to encode PNG: {}", e)))?;

    Ok(png_bytes)
}
