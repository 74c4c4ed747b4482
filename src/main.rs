use anyhow::{bail, Context, Result};
use clap::Parser;
use escpos_raster::{decode, Printer, StreamTransport, UsbTarget, UsbTransport};
use std::{fs::File, io, path::PathBuf};

//
// cargo run -- logo.png --usb 0416:5011
// cargo run -- logo.png -o logo.bin
//
#[derive(Debug, Parser)]
#[command(version, about = "Convert an image to an ESC/POS raster bit image")]
struct Args {
    /// Image to print (any format the image crate can decode)
    image: PathBuf,

    /// Write the frame to this file or device node
    #[arg(short, long, conflicts_with = "usb")]
    output: Option<PathBuf>,

    /// Send the frame to a USB printer, VID:PID[:SERIAL] in hex
    #[arg(long, value_parser = parse_usb_target)]
    usb: Option<UsbTarget>,
}

fn parse_usb_target(s: &str) -> Result<UsbTarget> {
    let mut parts = s.splitn(3, ':');
    let vid = parse_hex(parts.next().unwrap_or_default()).context("invalid vendor id")?;
    let pid = match parts.next() {
        Some(p) => parse_hex(p).context("invalid product id")?,
        None => bail!("expected VID:PID[:SERIAL]"),
    };

    let target = UsbTarget::new(vid, pid);
    Ok(match parts.next() {
        Some(serial) if !serial.is_empty() => target.serial(serial),
        _ => target,
    })
}

fn parse_hex(s: &str) -> Result<u16> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    Ok(u16::from_str_radix(digits, 16)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    let grid = decode::open(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;

    if let Some(target) = args.usb {
        let transport = UsbTransport::open(target.clone()).with_context(|| {
            format!(
                "failed to open printer {:04x}:{:04x}",
                target.vendor_id(),
                target.product_id()
            )
        })?;
        Printer::new(transport).print_grid(grid)?;
    } else if let Some(path) = args.output {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Printer::new(StreamTransport::new(file))
            .print_grid(grid)
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        let stdout = io::stdout();
        Printer::new(StreamTransport::new(stdout.lock())).print_grid(grid)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usb_target_with_serial() {
        let target = parse_usb_target("0x0416:5011:000L4G359687").unwrap();
        assert_eq!(target, UsbTarget::new(0x0416, 0x5011).serial("000L4G359687"));
    }

    #[test]
    fn usb_target_without_serial() {
        let target = parse_usb_target("04b8:0202").unwrap();
        assert_eq!(target, UsbTarget::new(0x04b8, 0x0202));
    }

    #[test]
    fn usb_target_needs_product_id() {
        assert!(parse_usb_target("04b8").is_err());
        assert!(parse_usb_target("zz:0202").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["escpos-raster", "logo.png", "-o", "out.bin"]).unwrap();
        assert_eq!(args.image, PathBuf::from("logo.png"));
        assert_eq!(args.output, Some(PathBuf::from("out.bin")));
        assert!(args.usb.is_none());

        assert!(
            Args::try_parse_from(["escpos-raster", "a.png", "-o", "x", "--usb", "1:2"]).is_err()
        );
    }
}
