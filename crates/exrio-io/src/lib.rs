//! # exrio-io
//!
//! Reads OpenEXR channels and layers into interleaved `f32` buffers and
//! writes such buffers back as RGB(A) images.
//!
//! # Architecture
//!
//! - [`codec`] - the only module that talks to the `exr` crate: header probe,
//!   scanline decode into bound planes, single-part encode
//! - [`marshal`] - stages one plane per channel, drives the codec and
//!   transposes planes to and from the interleaved layout
//! - [`ExrInputFile`] - an opened file with its channel catalog
//! - [`threads`] - process-wide codec thread count, fixed on first use
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use exrio_io::{read, read_named, write, is_exr_file};
//!
//! assert!(is_exr_file("render.exr"));
//!
//! let rgb = read("render.exr")?;                   // (h, w, 3): R, G, B
//! let diffuse = read_named("render.exr", "diffuse")?;
//!
//! write("copy.exr", &rgb)?;
//! ```
//!
//! # Data window
//!
//! Files may declare a data window that starts anywhere, including negative
//! coordinates. The returned buffer always covers exactly that window; row 0
//! is `min_y` and column 0 is `min_x`.

#![warn(missing_docs)]

pub mod codec;
mod container;
pub mod marshal;
mod options;
pub mod threads;

pub use container::{is_exr_file, ExrInputFile};
pub use options::{Compression, WriteOptions};
pub use threads::{global_thread_count, set_global_thread_count};

pub use exrio_core::{ChannelCatalog, DataWindow, Error, PixelBuffer, Result};

use std::path::Path;

/// Opens an OpenEXR file for channel and layer reads.
pub fn open<P: AsRef<Path>>(path: P) -> Result<ExrInputFile> {
    ExrInputFile::open(path)
}

/// Reads the `R`, `G`, `B` channels of a file.
///
/// # Errors
///
/// - [`Error::InvalidFormat`] if the file is not an OpenEXR file
/// - [`Error::NotFound`] if one of `R`, `G`, `B` is missing
/// - [`Error::Codec`] if decoding fails
pub fn read<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    open(path)?.get()
}

/// Reads a layer, or a single channel, by name.
///
/// Layers take precedence over channels of the same name.
pub fn read_named<P: AsRef<Path>>(path: P, name: &str) -> Result<PixelBuffer> {
    open(path)?.get_named(name)
}

/// Reads exactly the given channels, in the given order.
pub fn read_channels<P: AsRef<Path>, S: AsRef<str>>(path: P, names: &[S]) -> Result<PixelBuffer> {
    open(path)?.get_channels(names)
}

/// Writes a buffer of shape `(height, width, channels >= 3)`.
///
/// The first three channels are written as `R`, `G`, `B`; a fourth, if
/// present, as `A`. The data window is `(0, 0) - (width - 1, height - 1)`.
///
/// # Errors
///
/// - [`Error::InsufficientChannels`] for fewer than three channels
/// - [`Error::InvalidDimensions`] for an empty image
/// - [`Error::Codec`] if encoding fails
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<()> {
    write_with_options(path, buffer, &WriteOptions::default())
}

/// Writes a buffer with explicit compression and data window origin.
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    buffer: &PixelBuffer,
    options: &WriteOptions,
) -> Result<()> {
    marshal::write_buffer(path.as_ref(), buffer, options)
}

/// Writes samples described by a dynamic shape, as array libraries supply
/// them.
///
/// Fails with [`Error::InvalidShape`] unless `shape` has exactly three axes;
/// otherwise behaves like [`write`].
pub fn write_array<P: AsRef<Path>>(path: P, shape: &[usize], data: Vec<f32>) -> Result<()> {
    let buffer = PixelBuffer::from_shape(shape, data)?;
    write(path, &buffer)
}
