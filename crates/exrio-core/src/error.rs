//! Error types for exrio operations.
//!
//! A single [`Error`] enum covers every failure the channel marshaling
//! pipeline can report:
//!
//! - **Validation errors**: [`NotFound`](Error::NotFound),
//!   [`InvalidShape`](Error::InvalidShape),
//!   [`InsufficientChannels`](Error::InsufficientChannels),
//!   [`LengthMismatch`](Error::LengthMismatch),
//!   [`InvalidDimensions`](Error::InvalidDimensions),
//!   [`InvalidWindow`](Error::InvalidWindow),
//!   [`EmptySelection`](Error::EmptySelection),
//!   [`UnsupportedChannel`](Error::UnsupportedChannel)
//! - **Container errors**: [`InvalidFormat`](Error::InvalidFormat)
//! - **Transfer errors**: [`Codec`](Error::Codec), [`Io`](Error::Io)
//!
//! Validation errors are raised before any buffer is allocated or any pixel
//! data is touched. Codec errors can only surface mid-transfer and are
//! reported as-is; a failed read or write produces no partial result.
//!
//! # Usage
//!
//! ```rust
//! use exrio_core::{Error, Result};
//!
//! fn require_rgb(channels: usize) -> Result<()> {
//!     if channels < 3 {
//!         return Err(Error::InsufficientChannels { got: channels });
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_rgb(2).unwrap_err().is_validation_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing channel data.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is not a recognized OpenEXR container.
    ///
    /// Only raised when opening; the format probe itself never fails.
    #[error("file is not an OpenEXR file: {}", path.display())]
    InvalidFormat {
        /// Path that failed the format probe
        path: PathBuf,
    },

    /// A requested channel or layer is absent from the container.
    #[error("channel or layer could not be found: '{name}'")]
    NotFound {
        /// The first name that could not be resolved
        name: String,
    },

    /// A caller-supplied buffer does not have exactly three axes.
    #[error("input buffer must be three-dimensional (height, width, channels), got {ndim} dimension(s)")]
    InvalidShape {
        /// Number of axes the buffer actually has
        ndim: usize,
    },

    /// Fewer than three channels were supplied for writing.
    #[error("too few color channels: got {got}, need at least R, G and B")]
    InsufficientChannels {
        /// Channel count on the last axis
        got: usize,
    },

    /// Flat sample storage disagrees with the declared shape.
    #[error("buffer holds {actual} samples but its shape requires {expected}")]
    LengthMismatch {
        /// Sample count implied by the shape
        expected: usize,
        /// Sample count actually present
        actual: usize,
    },

    /// The image has a zero-sized axis.
    #[error("invalid dimensions: {width}x{height} (width and height must be non-zero)")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// The container declares a data window with non-positive area.
    #[error("invalid data window ({min_x}, {min_y}) - ({max_x}, {max_y})")]
    InvalidWindow {
        /// Minimum x coordinate (inclusive)
        min_x: i64,
        /// Minimum y coordinate (inclusive)
        min_y: i64,
        /// Maximum x coordinate (inclusive)
        max_x: i64,
        /// Maximum y coordinate (inclusive)
        max_y: i64,
    },

    /// A read was requested with an empty channel list.
    #[error("no channels selected")]
    EmptySelection,

    /// The channel exists but cannot be transferred into a float plane.
    #[error("channel '{name}' is not supported: {reason}")]
    UnsupportedChannel {
        /// Channel name
        name: String,
        /// Why it cannot be bound
        reason: String,
    },

    /// Opaque failure reported by the codec during decode or encode.
    #[error("codec failure: {0}")]
    Codec(String),

    /// File system error outside the codec.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::NotFound`] error.
    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates an [`Error::InvalidFormat`] error.
    #[inline]
    pub fn invalid_format(path: impl Into<PathBuf>) -> Self {
        Self::InvalidFormat { path: path.into() }
    }

    /// Creates an [`Error::UnsupportedChannel`] error.
    #[inline]
    pub fn unsupported_channel(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedChannel {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Codec`] error from any displayable codec failure.
    #[inline]
    pub fn codec(err: impl std::fmt::Display) -> Self {
        Self::Codec(err.to_string())
    }

    /// Returns `true` for errors detected before any I/O took place.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InvalidShape { .. }
                | Self::InsufficientChannels { .. }
                | Self::LengthMismatch { .. }
                | Self::InvalidDimensions { .. }
                | Self::InvalidWindow { .. }
                | Self::EmptySelection
                | Self::UnsupportedChannel { .. }
        )
    }

    /// Returns `true` if the codec or the file system failed mid-transfer.
    #[inline]
    pub fn is_transfer_error(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::Io(_))
    }
}
