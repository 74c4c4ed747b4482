//! Adapter from the `image` crate to [`PixelGrid`].

use std::path::Path;

use image::DynamicImage;
use log::debug;

use crate::{
    error::Result,
    pixel::{Pixel, PixelGrid},
};

/// Open and decode an image file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<PixelGrid> {
    let path = path.as_ref();
    debug!("decoding {}", path.display());
    let image = image::open(path)?;
    Ok(from_image(&image))
}

/// Decode an encoded image held in memory. The format is guessed from the
/// leading bytes.
pub fn from_memory(buf: &[u8]) -> Result<PixelGrid> {
    let image = image::load_from_memory(buf)?;
    Ok(from_image(&image))
}

/// Convert a decoded image to a pixel grid.
///
/// Every source goes through 16 bit RGBA. Color channels are premultiplied
/// by alpha (`c * a / 0xFFFF`) and each channel keeps its high byte, so 16
/// bit channels are scaled down by 8 bits. Opaque 8 bit pixels pass through
/// unchanged.
pub fn from_image(image: &DynamicImage) -> PixelGrid {
    let rgba = image.to_rgba16();
    let (width, height) = rgba.dimensions();
    debug!("decoded {}x{} {:?} image", width, height, image.color());

    let pixels = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            Pixel::new(
                high_byte(premultiply(r, a)),
                high_byte(premultiply(g, a)),
                high_byte(premultiply(b, a)),
                high_byte(a),
            )
        })
        .collect();
    PixelGrid::from_pixels(width, height, pixels)
}

fn premultiply(c: u16, a: u16) -> u16 {
    (u32::from(c) * u32::from(a) / 0xFFFF) as u16
}

fn high_byte(v: u16) -> u8 {
    (v >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{ImageBuffer, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn opaque_eight_bit_channels_pass_through() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
        img.put_pixel(1, 0, Rgba([250, 128, 0, 255]));

        let grid = from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(grid.dimensions(), (2, 1));
        assert_eq!(grid.get(0, 0), Pixel::new(1, 2, 3, 255));
        assert_eq!(grid.get(1, 0), Pixel::new(250, 128, 0, 255));
    }

    #[test]
    fn translucent_channels_are_premultiplied() {
        // 100 * 257 * 200 * 257 / 0xFFFF = 20157 -> 0x4E
        let img = RgbaImage::from_pixel(1, 1, Rgba([100, 255, 0, 200]));
        let grid = from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(grid.get(0, 0), Pixel::new(78, 200, 0, 200));
    }

    #[test]
    fn transparent_channels_are_zeroed() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0]));
        let grid = from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(grid.get(0, 0), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    fn sixteen_bit_channels_keep_high_byte() {
        let img: ImageBuffer<Rgba<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(1, 1, Rgba([0x12FF, 0x8000, 0x00FF, 0xFFFF]));
        let grid = from_image(&DynamicImage::ImageRgba16(img));
        assert_eq!(grid.get(0, 0), Pixel::new(0x12, 0x80, 0x00, 0xFF));
    }

    #[test]
    fn gray_source_expands_to_rgba() {
        let img = image::GrayImage::from_pixel(3, 2, image::Luma([77]));
        let grid = from_image(&DynamicImage::ImageLuma8(img));
        assert_eq!(grid.dimensions(), (3, 2));
        assert!(grid.pixels().iter().all(|p| *p == Pixel::new(77, 77, 77, 255)));
    }

    #[test]
    fn png_from_memory() {
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 0]));
        let grid = from_memory(&encode_png(DynamicImage::ImageRgba8(img))).unwrap();
        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.get(3, 2), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = from_memory(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = open("/nonexistent/escpos-raster/input.png").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
