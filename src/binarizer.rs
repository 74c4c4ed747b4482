//! Luminance threshold binarization.

use log::debug;

use crate::pixel::{Pixel, PixelGrid};

/// Luminance below this value prints black.
pub const THRESHOLD: f64 = 128.0;

/// Replace every pixel with pure black or pure white.
///
/// Expects an opaque grid (see [`crate::remove_transparency`]). Luminance is
/// `0.299*R + 0.587*G + 0.114*B`; anything below [`THRESHOLD`] turns black.
pub fn binarize(mut grid: PixelGrid) -> PixelGrid {
    debug!("binarizing {}x{} grid", grid.width(), grid.height());

    for pixel in grid.pixels_mut() {
        *pixel = if luminance(pixel) < THRESHOLD {
            Pixel::BLACK
        } else {
            Pixel::WHITE
        };
    }
    grid
}

fn luminance(pixel: &Pixel) -> f64 {
    f64::from(pixel.r) * 0.299 + f64::from(pixel.g) * 0.587 + f64::from(pixel.b) * 0.114
}
