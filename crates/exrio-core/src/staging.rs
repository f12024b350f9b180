//! Per-channel staging planes.
//!
//! A [`StagingPlane`] is a linear `f32` array covering one data window.
//! The codec delivers scanline runs tagged with absolute pixel coordinates;
//! the plane maps them through [`DataWindow::index`] so that a run starting
//! at `(x, y)` lands at `(x - min_x) + (y - min_y) * width`. No pointer
//! arithmetic outside the allocation is ever needed.

use crate::DataWindow;

/// A zero-initialized scalar plane addressed in absolute window coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingPlane {
    window: DataWindow,
    samples: Vec<f32>,
}

impl StagingPlane {
    /// Allocates a zeroed plane covering `window`.
    pub fn new(window: DataWindow) -> Self {
        Self {
            window,
            samples: vec![0.0; window.pixel_count()],
        }
    }

    /// Wraps existing samples laid out row-major over `window`.
    ///
    /// Returns `None` when the sample count does not match the window area.
    pub fn from_samples(window: DataWindow, samples: Vec<f32>) -> Option<Self> {
        (samples.len() == window.pixel_count()).then_some(Self { window, samples })
    }

    /// The window this plane covers.
    pub fn window(&self) -> &DataWindow {
        &self.window
    }

    /// Mutable run of `len` samples starting at absolute pixel `(x, y)`.
    ///
    /// Returns `None` if the run leaves the window or wraps past the end of
    /// its row.
    pub fn run_mut(&mut self, x: i32, y: i32, len: usize) -> Option<&mut [f32]> {
        let start = self.run_start(x, y, len)?;
        self.samples.get_mut(start..start + len)
    }

    /// Read-only run of `len` samples starting at absolute pixel `(x, y)`.
    pub fn run(&self, x: i32, y: i32, len: usize) -> Option<&[f32]> {
        let start = self.run_start(x, y, len)?;
        self.samples.get(start..start + len)
    }

    /// Sample at absolute pixel `(x, y)`.
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.window.try_index(x, y).map(|i| self.samples[i])
    }

    /// Samples in window-relative row-major order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consumes the plane, returning its samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    fn run_start(&self, x: i32, y: i32, len: usize) -> Option<usize> {
        let start = self.window.try_index(x, y)?;
        let col = (i64::from(x) - i64::from(self.window.min_x())) as usize;
        (col + len <= self.window.width()).then_some(start)
    }
}
