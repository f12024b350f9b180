//! Channel and layer extraction.
//!
//! Reads the default `R, G, B` set, a named layer/channel, or an explicit
//! channel list, and writes the result as a new `R, G, B[, A]` file.

use crate::ExtractArgs;
use anyhow::{bail, Context, Result};
use exrio_io::{PixelBuffer, WriteOptions};
use tracing::{debug, info, trace};

/// Runs the extract command.
pub fn run(args: ExtractArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "extract::run");

    let compression = super::parse_compression(&args.compression)?;
    let file = super::open_file(&args.input)?;

    let buffer = if !args.channels.is_empty() {
        file.get_channels(&args.channels)
    } else if let Some(name) = &args.layer {
        file.get_named(name)
    } else {
        file.get()
    }
    .with_context(|| format!("Failed to read: {}", args.input.display()))?;

    let buffer = widen_to_rgb(buffer)?;

    let mut options = WriteOptions::new().with_compression(compression);
    if args.keep_window {
        let window = file.data_window();
        options = options.with_origin(window.min_x(), window.min_y());
    }
    debug!(?options, shape = ?buffer.shape(), "writing");

    exrio_io::write_with_options(&args.output, &buffer, &options)
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    info!(output = %args.output.display(), channels = buffer.channels(), "extracted");
    if verbose > 0 {
        println!(
            "{} -> {} ({}x{}, {} channels)",
            args.input.display(),
            args.output.display(),
            buffer.width(),
            buffer.height(),
            buffer.channels().min(4)
        );
    }
    Ok(())
}

/// Makes a buffer writable: one channel is replicated to grey RGB, two
/// channels are rejected, three or more pass through.
fn widen_to_rgb(buffer: PixelBuffer) -> Result<PixelBuffer> {
    match buffer.channels() {
        1 => {
            let plane = buffer.as_slice();
            Ok(PixelBuffer::from_planes(
                buffer.height(),
                buffer.width(),
                &[plane, plane, plane],
            ))
        }
        2 => bail!("Two channels cannot be written as RGB; select one, three or four"),
        _ => Ok(buffer),
    }
}
