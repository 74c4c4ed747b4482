use image::DynamicImage;
use log::debug;
use std::path::Path;

use crate::{
    decode,
    error::Result,
    pipeline::convert,
    pixel::PixelGrid,
    transport::Transport,
};

/// Converts images and sends each one to a transport as a single frame.
///
/// # Example
///
/// ```rust,no_run
/// use escpos_raster::{Printer, UsbTarget, UsbTransport};
///
/// let transport = UsbTransport::open(UsbTarget::new(0x0416, 0x5011)).unwrap();
/// let mut printer = Printer::new(transport);
/// printer.print_file("receipt-logo.png").unwrap();
/// ```
pub struct Printer<T: Transport> {
    transport: T,
}

impl<T: Transport> Printer<T> {
    pub fn new(transport: T) -> Self {
        Printer { transport }
    }

    /// Print an already decoded pixel grid.
    pub fn print_grid(&mut self, grid: PixelGrid) -> Result<()> {
        let frame = convert(grid)?;
        debug!("sending {} byte frame", frame.len());
        self.transport.send(&frame)?;
        Ok(())
    }

    pub fn print_image(&mut self, image: &DynamicImage) -> Result<()> {
        self.print_grid(decode::from_image(image))
    }

    /// Decode an image file and print it.
    pub fn print_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let grid = decode::open(path)?;
        self.print_grid(grid)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}
