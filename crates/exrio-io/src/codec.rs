//! Boundary with the OpenEXR codec.
//!
//! Everything that touches the `exr` crate lives in this module. The rest of
//! the crate sees a narrow surface:
//!
//! - [`probe`] - read and validate the header only
//! - [`InputFile`] - header access plus [`InputFile::read_pixels`], which
//!   decodes the scanlines of the bound channels into a [`FrameBuffer`]
//! - [`OutputFile`] - [`OutputFile::write_pixels`] encodes a [`FrameBuffer`]
//!   as a single-part float image
//!
//! Block decompression and compression run on a pool of
//! [`global_thread_count`](crate::threads::global_thread_count) workers when
//! that count is greater than one, and on the calling thread otherwise.
//! Channels that are not bound are skipped without being decoded.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use exr::block::reader::{ChunksReader, ParallelBlockDecompressor};
use exr::block::writer::{ChunksWriter, ParallelBlocksCompressor};
use exr::block::UncompressedBlock;
use exr::image::write::layers::{LayersWriter, WritableLayers};
use exr::error::{Error as ExrError, UnitResult};
use exr::meta::attribute::SampleType;
use exr::meta::MetaData;
use exr::prelude::*;
use half::f16;
use smallvec::SmallVec;
use tracing::{debug, trace};

use exrio_core::{DataWindow, Error, Result, StagingPlane};

use crate::options::Compression;
use crate::threads;

/// Storage type of a channel inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// 16-bit float, widened to `f32` on read.
    F16,
    /// 32-bit float, transferred bit-exact.
    F32,
    /// 32-bit unsigned integer, converted to `f32` on read.
    U32,
}

impl From<SampleType> for SampleKind {
    fn from(t: SampleType) -> Self {
        match t {
            SampleType::F16 => Self::F16,
            SampleType::F32 => Self::F32,
            SampleType::U32 => Self::U32,
        }
    }
}

/// One channel as declared in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Full channel name, e.g. `diffuse.R`.
    pub name: String,
    /// Stored sample type.
    pub sample_type: SampleKind,
    /// Subsampling factors `(x, y)`; `(1, 1)` for full resolution.
    pub sampling: (usize, usize),
}

/// The header fields this crate consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Data window of the first part.
    pub window: DataWindow,
    /// Channels of the first part, in file order.
    pub channels: Vec<ChannelInfo>,
    /// Compression method name, for display.
    pub compression: String,
    /// True if pixel data is stored in tiles rather than scanlines.
    pub tiled: bool,
    /// True if the first part holds deep data.
    pub deep: bool,
    /// Number of parts in the file.
    pub parts: usize,
}

impl Header {
    fn from_meta(meta: &MetaData) -> Result<Self> {
        let header = meta
            .headers
            .first()
            .ok_or_else(|| Error::codec("file contains no header"))?;

        let position = header.own_attributes.layer_position;
        let window = DataWindow::from_origin_size(
            (position.x(), position.y()),
            (header.layer_size.width(), header.layer_size.height()),
        )?;

        let channels = header
            .channels
            .list
            .iter()
            .map(|c| ChannelInfo {
                name: c.name.to_string(),
                sample_type: c.sample_type.into(),
                sampling: (c.sampling.x(), c.sampling.y()),
            })
            .collect();

        Ok(Self {
            window,
            channels,
            compression: format!("{:?}", header.compression),
            tiled: header.blocks.has_tiles(),
            deep: header.deep,
            parts: meta.headers.len(),
        })
    }

    /// Looks up a channel by exact name.
    pub fn channel(&self, name: &str) -> Option<&ChannelInfo> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Channel names in file order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }
}

/// Reads the header of `path` and checks that its offset tables are present.
///
/// Pixel data is not decoded.
pub fn probe(path: impl AsRef<Path>) -> Result<Header> {
    let file = BufReader::new(File::open(path.as_ref())?);
    let reader = exr::block::read(file, false).map_err(Error::codec)?;
    let header = Header::from_meta(reader.meta_data())?;
    reader.all_chunks(false).map_err(Error::codec)?;
    Ok(header)
}

/// One named channel bound to a staging plane.
#[derive(Debug, Clone)]
pub struct Slice {
    /// Channel name in the container.
    pub name: String,
    /// Destination (read) or source (write) samples.
    pub plane: StagingPlane,
}

/// The set of channel bindings for one transfer.
///
/// Names are unique: inserting a name twice replaces the earlier plane.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    slices: Vec<Slice>,
}

impl FrameBuffer {
    /// Creates an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `plane` to channel `name`.
    pub fn insert(&mut self, name: impl Into<String>, plane: StagingPlane) {
        let name = name.into();
        match self.slices.iter_mut().find(|s| s.name == name) {
            Some(slice) => slice.plane = plane,
            None => self.slices.push(Slice { name, plane }),
        }
    }

    /// Index of the slice bound to `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.slices.iter().position(|s| s.name == name)
    }

    /// Bound slices in insertion order.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Number of bound channels.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Releases the staging planes in insertion order.
    pub fn into_planes(self) -> Vec<StagingPlane> {
        self.slices.into_iter().map(|s| s.plane).collect()
    }
}

/// An OpenEXR file opened for reading.
///
/// The header is read once on open. Every [`read_pixels`](Self::read_pixels)
/// call reopens the file, so reads never observe state left by earlier ones.
#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
    header: Header,
}

impl InputFile {
    /// Opens `path` and reads its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let header = probe(path)?;
        debug!(
            path = %path.display(),
            window = %header.window,
            channels = header.channels.len(),
            "opened exr"
        );
        Ok(Self {
            path: path.to_path_buf(),
            header,
        })
    }

    /// Path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header read at open time.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decodes every scanline of the data window into the bound planes.
    ///
    /// Runs with absolute coordinates: a line that the codec reports at
    /// window-relative `(px, py)` is stored at `(min_x + px, min_y + py)`.
    /// Unbound channels are skipped. Any decode error aborts the whole read.
    pub fn read_pixels(&self, frame_buffer: &mut FrameBuffer) -> Result<()> {
        let file = BufReader::new(File::open(&self.path)?);
        let reader = exr::block::read(file, false).map_err(Error::codec)?;

        let current = Header::from_meta(reader.meta_data())?;
        if current.window != self.header.window || current.channels != self.header.channels {
            return Err(Error::codec("file changed since it was opened"));
        }

        let window = self.header.window;
        let mut bindings: Vec<Option<usize>> = Vec::with_capacity(current.channels.len());
        let mut kinds: Vec<SampleKind> = Vec::with_capacity(current.channels.len());
        for channel in &current.channels {
            bindings.push(frame_buffer.position(&channel.name));
            kinds.push(channel.sample_type);
        }
        for slice in frame_buffer.slices() {
            if current.channel(&slice.name).is_none() {
                return Err(Error::not_found(&slice.name));
            }
            if slice.plane.window() != &window {
                return Err(Error::codec(format!(
                    "plane for '{}' does not cover the data window {}",
                    slice.name, window
                )));
            }
        }

        let reader = reader
            .filter_chunks(false, |_meta, _tile, block| {
                block.layer == 0 && block.level == Vec2(0, 0)
            })
            .map_err(Error::codec)?;

        let slices = &mut frame_buffer.slices;
        let mut widen_f16: Vec<f16> = Vec::new();
        let mut widen_u32: Vec<u32> = Vec::new();

        let insert_block = |meta: &MetaData, block: UncompressedBlock| -> UnitResult {
            let header = &meta.headers[block.index.layer];
            for line in block.lines(&header.channels) {
                let location = line.location;
                let Some(slot) = bindings[location.channel] else {
                    continue;
                };

                let x = window.min_x() + location.position.x() as i32;
                let y = window.min_y() + location.position.y() as i32;
                trace!(channel = slot, x, y, samples = location.sample_count, "scanline");

                let run = slices[slot]
                    .plane
                    .run_mut(x, y, location.sample_count)
                    .ok_or_else(|| ExrError::Invalid("scanline outside data window".into()))?;

                match kinds[location.channel] {
                    SampleKind::F32 => line.read_samples_into_slice(run)?,
                    SampleKind::F16 => {
                        widen_f16.clear();
                        widen_f16.resize(run.len(), f16::ZERO);
                        line.read_samples_into_slice(&mut widen_f16)?;
                        for (dst, src) in run.iter_mut().zip(&widen_f16) {
                            *dst = src.to_f32();
                        }
                    }
                    SampleKind::U32 => {
                        widen_u32.clear();
                        widen_u32.resize(run.len(), 0);
                        line.read_samples_into_slice(&mut widen_u32)?;
                        for (dst, &src) in run.iter_mut().zip(&widen_u32) {
                            *dst = src as f32;
                        }
                    }
                }
            }
            Ok(())
        };

        let decoded = if threads::use_parallel() {
            decompress_on_pool(reader, insert_block)
        } else {
            reader.decompress_sequential(false, insert_block)
        };
        decoded.map_err(Error::codec)
    }
}

/// Decompresses all chunks on a [`threads::codec_pool`], handing each block
/// to `insert_block` on the calling thread. Uncompressed files, and hosts
/// where the pool cannot be built, fall back to sequential decoding.
fn decompress_on_pool<R: ChunksReader>(
    reader: R,
    mut insert_block: impl FnMut(&MetaData, UncompressedBlock) -> UnitResult,
) -> UnitResult {
    let mut decompressor =
        match ParallelBlockDecompressor::new_with_thread_pool(reader, false, threads::codec_pool) {
            Ok(decompressor) => decompressor,
            Err(reader) => return reader.decompress_sequential(false, insert_block),
        };

    while let Some(block) = decompressor.next() {
        insert_block(decompressor.meta_data(), block?)?;
    }
    Ok(())
}

/// An OpenEXR file to be written as a single float part.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
    window: DataWindow,
    compression: Compression,
}

impl OutputFile {
    /// Prepares a file at `path` whose data window is `window`.
    ///
    /// Nothing touches the file system until [`write_pixels`](Self::write_pixels).
    pub fn create(path: impl AsRef<Path>, window: DataWindow, compression: Compression) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            window,
            compression,
        }
    }

    /// Encodes all rows of every bound plane as 32-bit float channels.
    pub fn write_pixels(self, frame_buffer: FrameBuffer) -> Result<()> {
        if frame_buffer.is_empty() {
            return Err(Error::EmptySelection);
        }

        let mut channels: SmallVec<[AnyChannel<FlatSamples>; 4]> = SmallVec::new();
        for slice in frame_buffer.slices {
            if slice.plane.window() != &self.window {
                return Err(Error::codec(format!(
                    "plane for '{}' does not cover the data window {}",
                    slice.name, self.window
                )));
            }
            channels.push(AnyChannel::new(
                slice.name.as_str(),
                FlatSamples::F32(slice.plane.into_samples()),
            ));
        }

        let mut attributes = LayerAttributes::default();
        attributes.layer_position = Vec2(self.window.min_x(), self.window.min_y());

        let encoding = Encoding {
            compression: self.compression.into(),
            ..Encoding::default()
        };

        let layer = Layer::new(
            (self.window.width(), self.window.height()),
            attributes,
            encoding,
            AnyChannels::sort(channels),
        );

        debug!(
            path = %self.path.display(),
            window = %self.window,
            compression = ?self.compression,
            "writing exr"
        );

        let image = Image::from_layer(layer);
        let headers = image.layer_data.infer_headers(&image.attributes);
        let layers = image.layer_data.create_writer(&headers);
        let file = BufWriter::new(File::create(&self.path)?);

        let written = exr::block::write(file, headers, true, |meta, chunk_writer| {
            let blocks = meta.collect_ordered_block_data(|index| {
                layers.extract_uncompressed_block(&meta.headers, index)
            });

            if threads::use_parallel() {
                if let Some(mut compressor) = ParallelBlocksCompressor::new_with_thread_pool(
                    &meta,
                    &mut *chunk_writer,
                    threads::codec_pool,
                ) {
                    for (index, block) in blocks {
                        compressor.add_block_to_compression_queue(index, block)?;
                    }
                    return Ok(());
                }
            }

            // uncompressed, single-threaded, or no pool available
            let mut compressor = chunk_writer.sequential_blocks_compressor(&meta);
            for (index, block) in blocks {
                compressor.compress_block(index, block)?;
            }
            Ok(())
        });
        written.map_err(Error::codec)
    }
}
