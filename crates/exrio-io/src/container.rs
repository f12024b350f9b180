//! Opened-file facade.
//!
//! [`ExrInputFile`] owns the opened codec handle and the channel catalog for
//! its lifetime and answers channel, layer and pixel requests against them.
//!
//! A handle is not meant to be shared between threads that read at the same
//! time; open one handle per thread instead.

use std::path::Path;

use tracing::debug;

use exrio_core::{ChannelCatalog, DataWindow, Error, PixelBuffer, Result};

use crate::codec::{self, Header, InputFile};
use crate::marshal;

/// Returns true if `path` is a readable OpenEXR file.
///
/// Only the header and offset tables are read. Every failure, including a
/// missing file, yields `false`; this function never reports an error.
pub fn is_exr_file(path: impl AsRef<Path>) -> bool {
    match codec::probe(path.as_ref()) {
        Ok(_) => true,
        Err(err) => {
            debug!(path = %path.as_ref().display(), error = %err, "not an exr file");
            false
        }
    }
}

/// An OpenEXR file opened for channel and layer reads.
///
/// # Example
///
/// ```rust,ignore
/// use exrio_io::ExrInputFile;
///
/// let file = ExrInputFile::open("render.exr")?;
/// println!("layers: {:?}", file.layers());
///
/// let beauty = file.get()?;                  // R, G, B
/// let diffuse = file.get_named("diffuse")?;  // diffuse.* in catalog order
/// let depth = file.get_channels(&["Z"])?;
/// ```
#[derive(Debug, Clone)]
pub struct ExrInputFile {
    file: InputFile,
    catalog: ChannelCatalog,
}

impl ExrInputFile {
    /// Opens `path`, failing with [`Error::InvalidFormat`] if it is not an
    /// OpenEXR file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = InputFile::open(path).map_err(|err| {
            debug!(path = %path.display(), error = %err, "probe failed");
            Error::invalid_format(path)
        })?;
        let catalog = ChannelCatalog::new(file.header().channel_names());
        Ok(Self { file, catalog })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Header as read at open time.
    pub fn header(&self) -> &Header {
        self.file.header()
    }

    /// The data window.
    pub fn data_window(&self) -> DataWindow {
        self.file.header().window
    }

    /// The channel catalog.
    pub fn catalog(&self) -> &ChannelCatalog {
        &self.catalog
    }

    /// Channel names in file order.
    pub fn channels(&self) -> &[String] {
        self.catalog.channels()
    }

    /// Layer names, sorted.
    pub fn layers(&self) -> Vec<String> {
        self.catalog.layers().map(str::to_string).collect()
    }

    /// Reads `R`, `G`, `B`.
    pub fn get(&self) -> Result<PixelBuffer> {
        self.read(None)
    }

    /// Reads a layer, or a single channel if no layer has that name.
    pub fn get_named(&self, name: &str) -> Result<PixelBuffer> {
        self.read(Some(name))
    }

    /// Reads exactly the given channels, in order.
    pub fn get_channels<S: AsRef<str>>(&self, names: &[S]) -> Result<PixelBuffer> {
        marshal::read_channels(&self.file, &self.catalog, names)
    }

    fn read(&self, name: Option<&str>) -> Result<PixelBuffer> {
        let selection = self.catalog.resolve(name)?;
        self.get_channels(&selection)
    }
}
