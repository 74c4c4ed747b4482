//! ESC/POS Raster Image Converter
//!
//! This crate turns images into `GS v 0` raster bit images for ESC/POS
//! compatible thermal printers.
//!
//! The conversion runs in four steps:
//! 1. transparent areas are painted over white,
//! 2. pixels are thresholded to black or white by luminance,
//! 3. the image is cropped to multiples of 8 and packed MSB first,
//! 4. the packed bits are prefixed with the raster command header.
//!
//! # Example
//!
//! ```rust,no_run
//! use escpos_raster::{Printer, StreamTransport};
//! use std::fs::OpenOptions;
//!
//! let device = OpenOptions::new().write(true).open("/dev/usb/lp0").unwrap();
//! let mut printer = Printer::new(StreamTransport::new(device));
//! printer.print_file("logo.png").unwrap();
//! ```
//!
//! The stages can also be driven one by one:
//!
//! ```rust
//! use escpos_raster::{binarize, rasterize, remove_transparency, Pixel, PixelGrid, PrintDimensions, PrintFrame};
//!
//! let grid = PixelGrid::filled(8, 8, Pixel::new(0, 0, 0, 255));
//! let grid = binarize(remove_transparency(grid));
//! let raster = rasterize(&grid, PrintDimensions::clamp(8, 8)).unwrap();
//! let frame = PrintFrame::new(8, 8, raster);
//! assert_eq!(frame.header(), &[0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x08, 0x00]);
//! assert_eq!(frame.body(), &[0xFF; 8]);
//! ```

mod binarizer;
mod compositor;
pub mod decode;
mod error;
mod frame;
mod pipeline;
mod pixel;
mod printer;
mod raster;
mod transport;

pub use crate::{
    binarizer::{binarize, THRESHOLD},
    compositor::remove_transparency,
    error::{Axis, DimensionError, Error, Result, TransportError},
    frame::{header, PrintFrame, HEADER_LEN, RASTER_COMMAND},
    pipeline::convert,
    pixel::{Pixel, PixelGrid},
    printer::Printer,
    raster::{rasterize, PrintDimensions, RasterBuffer},
    transport::{StreamTransport, Transport, UsbTarget, UsbTransport},
};
