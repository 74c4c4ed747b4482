//! Error types for image conversion and printing.
//!
//! Every failure falls into one of three kinds: the source image could not be
//! decoded, the raster dimensions were invalid, or the transport refused the
//! frame. None of them are retried.

use std::fmt;
use thiserror::Error;

/// Main error type for conversion and print operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The source image is unreadable or malformed.
    ///
    /// Wraps the underlying `image` error, including I/O failures while
    /// opening the file.
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Rasterization was requested with unusable dimensions.
    ///
    /// This is a caller-contract violation; no bytes are packed.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// The transport failed to accept the frame.
    #[error("Failed to write frame: {0}")]
    Write(#[from] TransportError),
}

/// Type alias for results of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Image axis, used to point at the offending dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Invalid raster dimensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("Print {axis} must be a multiple of 8, got {value}")]
    NotAligned { axis: Axis, value: u32 },

    #[error("Print {axis} {requested} exceeds image {axis} {actual}")]
    ExceedsGrid {
        axis: Axis,
        requested: u32,
        actual: u32,
    },
}

/// Errors raised while handing a frame to the output device.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Stream write failed (closed pipe, file system error, serial device gone).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// USB communication error.
    ///
    /// Wraps underlying rusb errors for timeouts, permission problems or
    /// a device that went away mid-transfer.
    #[error(transparent)]
    Usb(#[from] rusb::Error),

    #[error("No device found for {vendor_id:04x}:{product_id:04x}")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("Can't read device list, permission issue ?")]
    DeviceListNotReadable,

    #[error("Device is missing a bulk OUT endpoint")]
    MissingEndpoint,

    /// The device accepted fewer bytes than the frame holds.
    #[error("Short write: {written} of {expected} bytes, possibly timeout ?")]
    ShortWrite { written: usize, expected: usize },
}
