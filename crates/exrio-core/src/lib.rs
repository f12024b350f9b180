//! # exrio-core
//!
//! Codec-independent types for moving OpenEXR channel data in and out of
//! interleaved float buffers.
//!
//! # Overview
//!
//! - [`DataWindow`] - the container's addressable pixel rectangle, possibly
//!   starting at negative coordinates
//! - [`ChannelCatalog`] - channel names plus the layers derived from their
//!   `layer.channel` naming convention
//! - [`StagingPlane`] - a per-channel scalar plane addressed in absolute
//!   window coordinates
//! - [`PixelBuffer`] - the interleaved `(height, width, channels)` array
//!   handed to and received from callers
//! - [`Error`] / [`Result`] - the error type shared by every exrio crate
//!
//! Nothing here touches the file system; `exrio-io` drives the codec and
//! uses these types for addressing and transposition.
//!
//! # Example
//!
//! ```rust
//! use exrio_core::{ChannelCatalog, DataWindow, PixelBuffer, StagingPlane};
//!
//! let catalog = ChannelCatalog::new(["diffuse.R", "diffuse.G", "diffuse.B", "R", "G", "B"]);
//! let selection = catalog.resolve(Some("diffuse")).unwrap();
//! assert_eq!(selection, ["diffuse.R", "diffuse.G", "diffuse.B"]);
//!
//! let window = DataWindow::new(-1, -1, 0, 0).unwrap();
//! let mut planes: Vec<StagingPlane> = selection.iter().map(|_| StagingPlane::new(window)).collect();
//! planes[1].run_mut(-1, 0, 2).unwrap().copy_from_slice(&[0.25, 0.5]);
//!
//! let samples: Vec<&[f32]> = planes.iter().map(|p| p.samples()).collect();
//! let buffer = PixelBuffer::from_planes(window.height(), window.width(), &samples);
//! assert_eq!(buffer.shape(), [2, 2, 3]);
//! assert_eq!(buffer.get(1, 1, 1), 0.5);
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod catalog;
pub mod error;
pub mod staging;
pub mod window;

pub use buffer::PixelBuffer;
pub use catalog::{ChannelCatalog, DEFAULT_CHANNELS, LAYER_SEPARATOR};
pub use error::{Error, Result};
pub use staging::StagingPlane;
pub use window::DataWindow;
