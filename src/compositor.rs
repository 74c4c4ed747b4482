//! Alpha removal against a white backdrop.

use log::debug;

use crate::pixel::{Pixel, PixelGrid};

/// Paint every pixel over opaque white.
///
/// Each color channel becomes `(a*c + (255-a)*255) / 255` with truncating
/// integer division, and alpha is forced to 255.
pub fn remove_transparency(mut grid: PixelGrid) -> PixelGrid {
    debug!("compositing {}x{} grid over white", grid.width(), grid.height());

    for pixel in grid.pixels_mut() {
        *pixel = composite(*pixel);
    }
    grid
}

fn composite(pixel: Pixel) -> Pixel {
    let alpha = u32::from(pixel.a);
    let inv_alpha = 255 - alpha;
    let blend = |c: u8| ((alpha * u32::from(c) + inv_alpha * 255) / 255) as u8;

    Pixel::opaque(blend(pixel.r), blend(pixel.g), blend(pixel.b))
}
