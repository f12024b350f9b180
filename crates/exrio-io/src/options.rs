//! Write settings.

/// EXR compression method for written files.
///
/// Only lossless methods are offered, so a write followed by a read returns
/// bit-identical samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression.
    None,
    /// Run-length encoding.
    Rle,
    /// ZIP over blocks of 16 scanlines.
    #[default]
    Zip,
    /// Wavelet-based PIZ, good on noisy renders.
    Piz,
}

impl Compression {
    /// Parses a compression name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" | "uncompressed" => Some(Self::None),
            "rle" => Some(Self::Rle),
            "zip" => Some(Self::Zip),
            "piz" => Some(Self::Piz),
            _ => None,
        }
    }
}

impl From<Compression> for exr::compression::Compression {
    fn from(c: Compression) -> Self {
        match c {
            Compression::None => Self::Uncompressed,
            Compression::Rle => Self::RLE,
            Compression::Zip => Self::ZIP16,
            Compression::Piz => Self::PIZ,
        }
    }
}

/// Options for [`write_with_options`](crate::write_with_options).
///
/// # Example
///
/// ```rust
/// use exrio_io::{Compression, WriteOptions};
///
/// let opts = WriteOptions::new()
///     .with_compression(Compression::Piz)
///     .with_origin(-16, -16);
/// assert_eq!(opts.origin, (-16, -16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Compression method.
    pub compression: Compression,
    /// Minimum corner of the written data window.
    pub origin: (i32, i32),
}

impl WriteOptions {
    /// Default options: ZIP compression, window anchored at `(0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression method.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Places the data window's minimum corner at `(x, y)`.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_names() {
        assert_eq!(Compression::from_name("ZIP"), Some(Compression::Zip));
        assert_eq!(Compression::from_name("uncompressed"), Some(Compression::None));
        assert_eq!(Compression::from_name("dwaa"), None);
    }

    #[test]
    fn test_defaults() {
        let opts = WriteOptions::default();
        assert_eq!(opts.compression, Compression::Zip);
        assert_eq!(opts.origin, (0, 0));
    }
}
