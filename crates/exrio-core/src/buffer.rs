//! Interleaved pixel buffer.
//!
//! [`PixelBuffer`] is the only representation that crosses the API
//! boundary: a dense `(height, width, channels)` array of `f32`, row-major
//! with the channel axis varying fastest. It maps one-to-one onto a
//! C-contiguous numpy array of the same shape.
//!
//! The transposition between per-channel planes and the interleaved layout
//! lives here as well ([`PixelBuffer::from_planes`] and
//! [`PixelBuffer::to_planes`]). Values are moved, never converted, so the
//! round trip is bit-exact.

use crate::{Error, Result};

/// A dense `(height, width, channels)` array of 32-bit floats.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
            data: vec![0.0; height * width * channels],
        }
    }

    /// Wraps interleaved samples of a known shape.
    pub fn from_vec(height: usize, width: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        let expected = height * width * channels;
        if data.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// Wraps samples described by a dynamic shape, as handed over by array
    /// libraries.
    ///
    /// Fails with [`Error::InvalidShape`] unless the shape has exactly three
    /// axes, and with [`Error::LengthMismatch`] if the data does not fill it.
    pub fn from_shape(shape: &[usize], data: Vec<f32>) -> Result<Self> {
        match *shape {
            [height, width, channels] => Self::from_vec(height, width, channels, data),
            _ => Err(Error::InvalidShape { ndim: shape.len() }),
        }
    }

    /// Interleaves equally sized planes into a buffer.
    ///
    /// `output[i][j][c] = planes[c][j + i * width]`
    ///
    /// # Panics
    ///
    /// Panics if a plane does not hold exactly `height * width` samples.
    pub fn from_planes<P: AsRef<[f32]>>(height: usize, width: usize, planes: &[P]) -> Self {
        let channels = planes.len();
        let pixels = height * width;
        for plane in planes {
            assert_eq!(plane.as_ref().len(), pixels, "plane size does not match {}x{}", width, height);
        }

        let mut data = Vec::with_capacity(pixels * channels);
        for i in 0..height {
            for j in 0..width {
                let src = j + i * width;
                data.extend(planes.iter().map(|p| p.as_ref()[src]));
            }
        }

        Self {
            height,
            width,
            channels,
            data,
        }
    }

    /// Splits the first `count` channels into separate planes.
    ///
    /// `planes[c][j + i * width] = self[i][j][c]`
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the channel count.
    pub fn to_planes(&self, count: usize) -> Vec<Vec<f32>> {
        assert!(
            count <= self.channels,
            "requested {} planes from a {}-channel buffer",
            count,
            self.channels
        );
        let mut planes = vec![Vec::with_capacity(self.pixel_count()); count];
        for pixel in self.data.chunks_exact(self.channels.max(1)) {
            for (plane, &value) in planes.iter_mut().zip(pixel) {
                plane.push(value);
            }
        }
        planes
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape as `[height, width, channels]`.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }

    /// Number of pixels (`height * width`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    /// Linear offset of `(row, col, channel)` in the interleaved data.
    #[inline]
    pub fn offset(&self, row: usize, col: usize, channel: usize) -> usize {
        debug_assert!(row < self.height && col < self.width && channel < self.channels);
        (row * self.width + col) * self.channels + channel
    }

    /// Sample at `(row, col, channel)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.data[self.offset(row, col, channel)]
    }

    /// Sets the sample at `(row, col, channel)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: f32) {
        let i = self.offset(row, col, channel);
        self.data[i] = value;
    }

    /// All channels of one pixel.
    pub fn pixel(&self, row: usize, col: usize) -> &[f32] {
        let start = self.offset(row, col, 0);
        &self.data[start..start + self.channels]
    }

    /// Interleaved samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable interleaved samples.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the buffer, returning the interleaved samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
