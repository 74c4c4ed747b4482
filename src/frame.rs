//! `GS v 0` raster bit image framing.

use log::warn;

use crate::raster::RasterBuffer;

/// `GS v 0 m` with normal density (`m = 0`).
pub const RASTER_COMMAND: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

/// Command bytes plus the four dimension bytes.
pub const HEADER_LEN: usize = 8;

/// Header followed by the packed raster body, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintFrame {
    bytes: Vec<u8>,
}

impl PrintFrame {
    /// Frame a raster.
    ///
    /// `width` and `height` are the original image dimensions, not the
    /// clamped raster dimensions. The header stores the width in bytes
    /// (`width >> 3`) and the height in dots, both little-endian; the command
    /// expects exactly that layout.
    pub fn new(width: u32, height: u32, raster: RasterBuffer) -> Self {
        let mut bytes: Vec<u8> = Vec::with_capacity(HEADER_LEN + raster.len());
        bytes.extend_from_slice(&header(width, height));
        bytes.append(&mut raster.into_bytes());
        PrintFrame { bytes }
    }

    pub fn header(&self) -> &[u8] {
        &self.bytes[..HEADER_LEN]
    }

    pub fn body(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true: the header is always present.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for PrintFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encode the 8 byte raster header.
pub fn header(width: u32, height: u32) -> [u8; HEADER_LEN] {
    let width_bytes = width >> 3;
    if width_bytes > 0xFFFF || height > 0xFFFF {
        warn!(
            "{}x{} does not fit the 16 bit header fields, dimensions will wrap",
            width, height
        );
    }

    [
        RASTER_COMMAND[0],
        RASTER_COMMAND[1],
        RASTER_COMMAND[2],
        RASTER_COMMAND[3],
        (width_bytes & 0xFF) as u8,
        ((width_bytes >> 8) & 0xFF) as u8,
        (height & 0xFF) as u8,
        ((height >> 8) & 0xFF) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pixel::{Pixel, PixelGrid},
        raster::{rasterize, PrintDimensions},
    };

    #[test]
    fn header_for_24x16() {
        assert_eq!(
            header(24, 16),
            [0x1D, 0x76, 0x30, 0x00, 0x03, 0x00, 0x10, 0x00]
        );
    }

    #[test]
    fn width_in_bytes_height_in_dots() {
        // 576 dots = 72 bytes, 300 rows = 0x012C
        assert_eq!(
            header(576, 300),
            [0x1D, 0x76, 0x30, 0x00, 0x48, 0x00, 0x2C, 0x01]
        );
        // 4096 dots = 512 bytes = 0x0200
        assert_eq!(&header(4096, 8)[4..], &[0x00, 0x02, 0x08, 0x00]);
    }

    #[test]
    fn oversized_dimensions_wrap() {
        // 0x80000 dots = 0x10000 bytes, masked to 0x0000; height 0x10001 -> 0x0001
        assert_eq!(&header(0x80000, 0x10001)[4..], &[0x00, 0x00, 0x01, 0x00]);
        // largest width that still fits: 0xFFFF bytes
        assert_eq!(&header(0xFFFF << 3, 0xFFFF)[4..], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn header_uses_original_dimensions() {
        let grid = PixelGrid::filled(10, 9, Pixel::WHITE);
        let raster = rasterize(&grid, PrintDimensions::clamp(10, 9)).unwrap();
        let frame = PrintFrame::new(10, 9, raster);
        assert_eq!(frame.header(), &[0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x09, 0x00]);
        assert_eq!(frame.body(), &[0x00; 8]);
    }

    #[test]
    fn body_follows_header_without_gap() {
        let grid = PixelGrid::from_fn(24, 16, |x, _| if x < 8 { Pixel::BLACK } else { Pixel::WHITE });
        let raster = rasterize(&grid, PrintDimensions::new(24, 16).unwrap()).unwrap();
        let frame = PrintFrame::new(24, 16, raster);

        assert_eq!(frame.len(), HEADER_LEN + 3 * 16);
        assert_eq!(&frame.as_bytes()[..HEADER_LEN], &header(24, 16));
        assert_eq!(&frame.as_bytes()[HEADER_LEN..HEADER_LEN + 3], &[0xFF, 0x00, 0x00]);
    }
}
