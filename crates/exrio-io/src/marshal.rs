//! Pixel marshaling between the codec and interleaved buffers.
//!
//! Reading stages one [`StagingPlane`] per selected channel, binds the planes
//! in a [`FrameBuffer`], lets the codec decode every scanline of the data
//! window into them, then interleaves the planes into a
//! `(height, width, channels)` [`PixelBuffer`] in the caller's order.
//!
//! Writing runs the same steps backwards: the buffer is split into `R`, `G`,
//! `B` (and `A`) planes over a window anchored at the requested origin and
//! handed to the codec in one call.
//!
//! All validation happens before the first allocation. A codec failure
//! aborts the transfer and nothing is returned.

use std::path::Path;

use tracing::{debug, trace, warn};

use exrio_core::{ChannelCatalog, DataWindow, Error, PixelBuffer, Result, StagingPlane};

use crate::codec::{FrameBuffer, InputFile, OutputFile};
use crate::options::WriteOptions;

/// Channel names used for written buffers, by position on the last axis.
pub const WRITE_CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

/// Reads the named channels, in the given order, into an interleaved buffer.
///
/// Names may repeat; each occurrence gets its own copy of the channel.
pub fn read_channels<S: AsRef<str>>(
    file: &InputFile,
    catalog: &ChannelCatalog,
    names: &[S],
) -> Result<PixelBuffer> {
    if names.is_empty() {
        return Err(Error::EmptySelection);
    }
    catalog.require(names)?;

    let header = file.header();
    for name in names {
        let name = name.as_ref();
        let info = header.channel(name).ok_or_else(|| Error::not_found(name))?;
        if info.sampling != (1, 1) {
            return Err(Error::unsupported_channel(
                name,
                format!("subsampled {}x{}", info.sampling.0, info.sampling.1),
            ));
        }
    }
    if header.deep {
        return Err(Error::unsupported_channel(names[0].as_ref(), "deep data"));
    }

    let window = header.window;

    // one plane per distinct channel; `slots` maps each requested position to it
    let mut frame_buffer = FrameBuffer::new();
    let mut slots = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        let slot = match frame_buffer.position(name) {
            Some(slot) => slot,
            None => {
                trace!(channel = name, window = %window, "binding staging plane");
                frame_buffer.insert(name, StagingPlane::new(window));
                frame_buffer.len() - 1
            }
        };
        slots.push(slot);
    }

    debug!(
        path = %file.path().display(),
        channels = names.len(),
        width = window.width(),
        height = window.height(),
        "reading channels"
    );
    file.read_pixels(&mut frame_buffer)?;

    let planes = frame_buffer.into_planes();
    let ordered: Vec<&[f32]> = slots.iter().map(|&s| planes[s].samples()).collect();
    Ok(PixelBuffer::from_planes(window.height(), window.width(), &ordered))
}

/// Channel names assigned to a buffer with `channels` entries on its last axis.
///
/// Three channels become `R, G, B`; four or more become `R, G, B, A`.
pub fn output_channel_names(channels: usize) -> Result<&'static [&'static str]> {
    match channels {
        0..=2 => Err(Error::InsufficientChannels { got: channels }),
        3 => Ok(&WRITE_CHANNELS[..3]),
        _ => Ok(&WRITE_CHANNELS[..]),
    }
}

/// Writes an interleaved buffer as an `R, G, B[, A]` float image.
///
/// Channels beyond the fourth are not written.
pub fn write_buffer(path: &Path, buffer: &PixelBuffer, options: &WriteOptions) -> Result<()> {
    let names = output_channel_names(buffer.channels())?;
    if buffer.channels() > names.len() {
        warn!(
            channels = buffer.channels(),
            written = names.len(),
            "dropping channels beyond RGBA"
        );
    }
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(Error::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let window = DataWindow::from_origin_size(options.origin, (buffer.width(), buffer.height()))?;

    let mut frame_buffer = FrameBuffer::new();
    for (name, samples) in names.iter().zip(buffer.to_planes(names.len())) {
        let plane = StagingPlane::from_samples(window, samples).ok_or(Error::LengthMismatch {
            expected: window.pixel_count(),
            actual: buffer.pixel_count(),
        })?;
        frame_buffer.insert(*name, plane);
    }

    debug!(
        path = %path.display(),
        channels = names.len(),
        window = %window,
        "writing channels"
    );
    OutputFile::create(path, window, options.compression).write_pixels(frame_buffer)
}
