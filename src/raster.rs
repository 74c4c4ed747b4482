//! Bit-packing of binarized grids into printer raster bytes.
//!
//! The raster graphics command addresses whole bytes per row, so only
//! dimensions that are multiples of 8 can be printed. [`PrintDimensions`]
//! carries that guarantee in the type: it is either clamped down from the
//! image size or validated explicitly, and [`rasterize`] accepts nothing
//! else.

use log::{debug, warn};

use crate::{
    error::{Axis, DimensionError, Result},
    pixel::PixelGrid,
};

/// Width and height of the printed area, both multiples of 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintDimensions {
    width: u32,
    height: u32,
}

impl PrintDimensions {
    /// Validate dimensions supplied by the caller.
    ///
    /// Fails with [`DimensionError::NotAligned`] instead of rounding, so a
    /// caller that skipped the clamp finds out here.
    pub fn new(width: u32, height: u32) -> std::result::Result<Self, DimensionError> {
        check_aligned(Axis::Width, width)?;
        check_aligned(Axis::Height, height)?;
        Ok(PrintDimensions { width, height })
    }

    /// Largest multiples of 8 not exceeding `width` and `height`.
    pub fn clamp(width: u32, height: u32) -> Self {
        PrintDimensions {
            width: width / 8 * 8,
            height: height / 8 * 8,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes per raster row.
    pub fn bytes_per_row(&self) -> usize {
        (self.width / 8) as usize
    }

    /// Total packed length of a raster with these dimensions.
    pub fn byte_len(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }
}

fn check_aligned(axis: Axis, value: u32) -> std::result::Result<(), DimensionError> {
    if value % 8 == 0 {
        Ok(())
    } else {
        Err(DimensionError::NotAligned { axis, value })
    }
}

/// Packed monochrome raster, one bit per dot, MSB first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    dimensions: PrintDimensions,
    bytes: Vec<u8>,
}

impl RasterBuffer {
    pub fn dimensions(&self) -> PrintDimensions {
        self.dimensions
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Packed bytes of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let n = self.dimensions.bytes_per_row();
        let start = y as usize * n;
        &self.bytes[start..start + n]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Pack a binarized grid into raster bytes.
///
/// For each row and each group of 8 columns starting at `x`, bit 7 holds
/// column `x` and bit 0 holds column `x+7`. Black dots (red channel 0) are
/// 1. Columns and rows past `dims` are dropped.
pub fn rasterize(grid: &PixelGrid, dims: PrintDimensions) -> Result<RasterBuffer> {
    if dims.width > grid.width() {
        return Err(DimensionError::ExceedsGrid {
            axis: Axis::Width,
            requested: dims.width,
            actual: grid.width(),
        }
        .into());
    }
    if dims.height > grid.height() {
        return Err(DimensionError::ExceedsGrid {
            axis: Axis::Height,
            requested: dims.height,
            actual: grid.height(),
        }
        .into());
    }

    if dims.width < grid.width() || dims.height < grid.height() {
        warn!(
            "cropping {}x{} image to {}x{}",
            grid.width(),
            grid.height(),
            dims.width,
            dims.height
        );
    }
    debug!(
        "rasterizing {}x{} ({} bytes per row)",
        dims.width,
        dims.height,
        dims.bytes_per_row()
    );

    let mut bytes: Vec<u8> = Vec::with_capacity(dims.byte_len());
    for y in 0..dims.height {
        let row = &grid.row(y)[..dims.width as usize];
        for chunk in row.chunks_exact(8) {
            let mut byte: u8 = 0x00;
            for (i, pixel) in chunk.iter().enumerate() {
                if pixel.is_black() {
                    byte |= 0x80 >> i;
                }
            }
            bytes.push(byte);
        }
    }

    Ok(RasterBuffer {
        dimensions: dims,
        bytes,
    })
}
