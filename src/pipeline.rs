use log::info;

use crate::{
    binarizer::binarize,
    compositor::remove_transparency,
    error::Result,
    frame::PrintFrame,
    pixel::PixelGrid,
    raster::{rasterize, PrintDimensions},
};

/// Run the whole conversion: composite over white, threshold, clamp to
/// multiples of 8, pack and frame.
///
/// The header carries the dimensions of `grid` as given; the body only
/// covers the clamped area.
pub fn convert(grid: PixelGrid) -> Result<PrintFrame> {
    let (width, height) = grid.dimensions();

    let grid = remove_transparency(grid);
    let grid = binarize(grid);

    let dims = PrintDimensions::clamp(width, height);
    let raster = rasterize(&grid, dims)?;

    let frame = PrintFrame::new(width, height, raster);
    info!(
        "converted {}x{} image to {} byte frame",
        width,
        height,
        frame.len()
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;

    #[test]
    fn transparent_8x8_is_blank() {
        let frame = convert(PixelGrid::filled(8, 8, Pixel::new(0, 0, 0, 0))).unwrap();
        assert_eq!(frame.header(), &[0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x08, 0x00]);
        assert_eq!(frame.body(), &[0x00; 8]);
    }

    #[test]
    fn opaque_black_8x8_is_solid() {
        let frame = convert(PixelGrid::filled(8, 8, Pixel::new(0, 0, 0, 255))).unwrap();
        assert_eq!(frame.body(), &[0xFF; 8]);
    }

    #[test]
    fn odd_size_crops_body_but_not_header() {
        let frame = convert(PixelGrid::filled(10, 9, Pixel::BLACK)).unwrap();
        assert_eq!(&frame.header()[4..], &[0x01, 0x00, 0x09, 0x00]);
        assert_eq!(frame.body(), &[0xFF; 8]);
    }

    #[test]
    fn tiny_image_has_empty_body() {
        let frame = convert(PixelGrid::filled(4, 4, Pixel::BLACK)).unwrap();
        assert_eq!(frame.header(), &[0x1D, 0x76, 0x30, 0x00, 0x00, 0x00, 0x04, 0x00]);
        assert!(frame.body().is_empty());
    }

    #[test]
    fn semi_transparent_dark_pixel_prints_when_alpha_is_high() {
        // alpha 200 over white: (200*0 + 55*255) / 255 = 55 -> black
        // alpha 100 over white: (100*0 + 155*255) / 255 = 155 -> white
        let grid = PixelGrid::from_fn(16, 8, |x, _| {
            if x < 8 {
                Pixel::new(0, 0, 0, 200)
            } else {
                Pixel::new(0, 0, 0, 100)
            }
        });
        let frame = convert(grid).unwrap();
        for row in frame.body().chunks(2) {
            assert_eq!(row, &[0xFF, 0x00]);
        }
    }
}
