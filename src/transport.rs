//! Output backends for print frames.
//!
//! A frame is always handed over whole: the header and raster body are built
//! in memory first and go out in a single write, so a failure never leaves a
//! header on the wire without a complete body behind it from our side.

use log::{debug, info};
use rusb::{Context, Device, DeviceDescriptor, DeviceHandle, Direction, TransferType, UsbContext};
use std::{io::Write, time::Duration};

use crate::{error::TransportError, frame::PrintFrame};

/// Something a [`PrintFrame`] can be sent to.
pub trait Transport {
    fn send(&mut self, frame: &PrintFrame) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, frame: &PrintFrame) -> Result<(), TransportError> {
        (**self).send(frame)
    }
}

/// Transport over any byte stream: a file, a TCP socket, a serial device
/// node or `/dev/usb/lp0`.
#[derive(Debug)]
pub struct StreamTransport<W: Write> {
    writer: W,
}

impl<W: Write> StreamTransport<W> {
    pub fn new(writer: W) -> Self {
        StreamTransport { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for StreamTransport<W> {
    fn send(&mut self, frame: &PrintFrame) -> Result<(), TransportError> {
        debug!("writing {} byte frame to stream", frame.len());
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Which USB printer to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbTarget {
    vendor_id: u16,
    product_id: u16,
    serial: Option<String>,
    timeout: Duration,
}

impl UsbTarget {
    /// Match the first device with this vendor and product id.
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        UsbTarget {
            vendor_id,
            product_id,
            serial: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Only match the device reporting this serial number.
    pub fn serial(self, serial: impl Into<String>) -> Self {
        UsbTarget {
            serial: Some(serial.into()),
            ..self
        }
    }

    /// Bulk write timeout, 10 seconds unless set.
    pub fn timeout(self, timeout: Duration) -> Self {
        UsbTarget { timeout, ..self }
    }

    pub fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    pub fn product_id(&self) -> u16 {
        self.product_id
    }
}

/// Location of the printer-class bulk OUT endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BulkOut {
    configuration: u8,
    interface: u8,
    alt_setting: u8,
    address: u8,
}

/// USB printer reached through its bulk OUT endpoint.
pub struct UsbTransport {
    handle: DeviceHandle<Context>,
    endpoint: BulkOut,
    timeout: Duration,
}

impl UsbTransport {
    pub fn open(target: UsbTarget) -> Result<Self, TransportError> {
        let mut context = Context::new()?;
        let (device, device_desc, mut handle) = Self::open_device(&mut context, &target)?;

        let endpoint =
            Self::find_bulk_out(&device, &device_desc).ok_or(TransportError::MissingEndpoint)?;

        // Some platforms do not support detaching; claiming may still work.
        if let Err(err) = handle.set_auto_detach_kernel_driver(true) {
            debug!("auto detach kernel driver unavailable: {:?}", err);
        }
        handle.set_active_configuration(endpoint.configuration)?;
        handle.claim_interface(endpoint.interface)?;
        handle.set_alternate_setting(endpoint.interface, endpoint.alt_setting)?;

        info!(
            "opened printer {:04x}:{:04x}, endpoint {:#04x}",
            target.vendor_id, target.product_id, endpoint.address
        );

        Ok(UsbTransport {
            handle,
            endpoint,
            timeout: target.timeout,
        })
    }

    fn open_device(
        context: &mut Context,
        target: &UsbTarget,
    ) -> Result<(Device<Context>, DeviceDescriptor, DeviceHandle<Context>), TransportError> {
        let devices = context.devices()?;

        if devices.is_empty() {
            debug!("Failed to read device list");
            return Err(TransportError::DeviceListNotReadable);
        }
        for device in devices.iter() {
            let device_desc = match device.device_descriptor() {
                Ok(d) => d,
                Err(err) => {
                    debug!("{:?}", err);
                    continue;
                }
            };

            if device_desc.vendor_id() != target.vendor_id
                || device_desc.product_id() != target.product_id
            {
                continue;
            }
            debug!("{:?}", device_desc);

            let handle = match device.open() {
                Ok(handle) => handle,
                Err(err) => {
                    debug!("Failed to open device: {:?}", err);
                    continue;
                }
            };

            let serial = match &target.serial {
                Some(serial) => serial,
                None => return Ok((device, device_desc, handle)),
            };

            let timeout = Duration::from_secs(1);
            let matched = serial_matches(serial, || {
                let languages = handle.read_languages(timeout)?;
                let language = languages.first().copied().ok_or(rusb::Error::NotFound)?;
                handle.read_serial_number_string(language, &device_desc, timeout)
            });
            if matched {
                return Ok((device, device_desc, handle));
            }
        }
        debug!("No device match with this serial: {:?}", target.serial);
        Err(TransportError::DeviceNotFound {
            vendor_id: target.vendor_id,
            product_id: target.product_id,
        })
    }

    /// First bulk OUT endpoint across all configurations and alt settings.
    fn find_bulk_out(device: &Device<Context>, device_desc: &DeviceDescriptor) -> Option<BulkOut> {
        (0..device_desc.num_configurations())
            .filter_map(|n| device.config_descriptor(n).ok())
            .find_map(|config| {
                config
                    .interfaces()
                    .flat_map(|interface| interface.descriptors())
                    .find_map(|alt| {
                        alt.endpoint_descriptors()
                            .find(|ep| is_bulk_out(ep.direction(), ep.transfer_type()))
                            .map(|ep| BulkOut {
                                configuration: config.number(),
                                interface: alt.interface_number(),
                                alt_setting: alt.setting_number(),
                                address: ep.address(),
                            })
                    })
            })
    }
}

fn is_bulk_out(direction: Direction, transfer_type: TransferType) -> bool {
    direction == Direction::Out && transfer_type == TransferType::Bulk
}

/// Read the serial of a candidate device and compare it. A device that
/// cannot report its serial is skipped, not fatal.
fn serial_matches<F>(wanted: &str, read_serial: F) -> bool
where
    F: FnOnce() -> rusb::Result<String>,
{
    match read_serial() {
        Ok(s) if s == wanted => true,
        Ok(s) => {
            debug!("Skipping device with serial {:?}", s);
            false
        }
        Err(err) => {
            debug!("Failed to read serial number string: {:?}", err);
            false
        }
    }
}

impl Transport for UsbTransport {
    fn send(&mut self, frame: &PrintFrame) -> Result<(), TransportError> {
        let buf = frame.as_bytes();
        let n = self
            .handle
            .write_bulk(self.endpoint.address, buf, self.timeout)?;
        check_written(n, buf.len())
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if let Err(err) = self.handle.release_interface(self.endpoint.interface) {
            debug!("Failed to release interface: {:?}", err);
        }
    }
}

fn check_written(written: usize, expected: usize) -> Result<(), TransportError> {
    if written == expected {
        Ok(())
    } else {
        debug!(
            "write error: bytes wrote {} != bytes supplied {}, possibly timeout ?",
            written, expected
        );
        Err(TransportError::ShortWrite { written, expected })
    }
}
