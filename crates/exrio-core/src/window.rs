//! Data window: the addressable pixel rectangle of a container.
//!
//! OpenEXR stores pixels only inside the *data window*, an inclusive integer
//! rectangle that does not have to start at the origin. Renderers routinely
//! emit windows such as `(-2, -3) - (5, 4)` for overscan, so every buffer
//! address must be computed relative to the window minimum.
//!
//! ```text
//!  (min_x, min_y)
//!        ┌───────────────┐
//!        │  data window  │  height = max_y - min_y + 1
//!        └───────────────┘
//!                 (max_x, max_y)
//!        width = max_x - min_x + 1
//! ```
//!
//! [`DataWindow::index`] is the single place where absolute pixel
//! coordinates become linear buffer indices:
//!
//! ```rust
//! use exrio_core::DataWindow;
//!
//! let window = DataWindow::new(-2, -3, 5, 4).unwrap();
//! assert_eq!((window.width(), window.height()), (8, 8));
//! assert_eq!(window.index(-2, -3), 0);
//! assert_eq!(window.index(0, 0), 2 + 3 * 8);
//! ```

use crate::{Error, Result};

/// An inclusive integer pixel rectangle, possibly offset from the origin.
///
/// # Invariants
///
/// - `max_x >= min_x` and `max_y >= min_y`, so width and height are positive
/// - Immutable once constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataWindow {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl DataWindow {
    /// Creates a window from inclusive corner coordinates.
    ///
    /// Fails with [`Error::InvalidWindow`] when either axis has non-positive
    /// extent.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Result<Self> {
        if max_x < min_x || max_y < min_y {
            return Err(Error::InvalidWindow {
                min_x: min_x.into(),
                min_y: min_y.into(),
                max_x: max_x.into(),
                max_y: max_y.into(),
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Creates a window from its minimum corner and size in pixels.
    ///
    /// This is the representation the codec reports (position + size).
    pub fn from_origin_size(origin: (i32, i32), size: (usize, usize)) -> Result<Self> {
        let (x, y) = origin;
        let (width, height) = size;
        let invalid = || Error::InvalidWindow {
            min_x: x.into(),
            min_y: y.into(),
            max_x: i64::from(x) + width as i64 - 1,
            max_y: i64::from(y) + height as i64 - 1,
        };

        if width == 0 || height == 0 {
            return Err(invalid());
        }
        let max_x = i32::try_from(i64::from(x) + width as i64 - 1).map_err(|_| invalid())?;
        let max_y = i32::try_from(i64::from(y) + height as i64 - 1).map_err(|_| invalid())?;
        Self::new(x, y, max_x, max_y)
    }

    /// Creates a window anchored at `(0, 0)`.
    ///
    /// Every file written by this crate uses such a window unless an explicit
    /// origin is requested.
    pub fn from_size(width: usize, height: usize) -> Result<Self> {
        Self::from_origin_size((0, 0), (width, height))
    }

    /// Minimum x coordinate (inclusive).
    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Minimum y coordinate (inclusive).
    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Maximum x coordinate (inclusive).
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Maximum y coordinate (inclusive).
    #[inline]
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Minimum corner as `(x, y)`.
    #[inline]
    pub fn min(&self) -> (i32, i32) {
        (self.min_x, self.min_y)
    }

    /// Maximum corner as `(x, y)`.
    #[inline]
    pub fn max(&self) -> (i32, i32) {
        (self.max_x, self.max_y)
    }

    /// Width in pixels, `max_x - min_x + 1`.
    #[inline]
    pub fn width(&self) -> usize {
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as usize
    }

    /// Height in pixels, `max_y - min_y + 1`.
    #[inline]
    pub fn height(&self) -> usize {
        (i64::from(self.max_y) - i64::from(self.min_y) + 1) as usize
    }

    /// Number of pixels inside the window.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Returns true if the absolute coordinate lies inside the window.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Linear index of absolute pixel `(x, y)` in a window-sized plane.
    ///
    /// `index(x, y) = (x - min_x) + (y - min_y) * width`
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(
            self.contains(x, y),
            "pixel ({}, {}) outside data window {:?}",
            x,
            y,
            self
        );
        let col = (i64::from(x) - i64::from(self.min_x)) as usize;
        let row = (i64::from(y) - i64::from(self.min_y)) as usize;
        col + row * self.width()
    }

    /// Checked variant of [`index`](Self::index).
    #[inline]
    pub fn try_index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y).then(|| self.index(x, y))
    }

    /// Iterates the absolute row coordinates `min_y..=max_y`.
    pub fn rows(&self) -> std::ops::RangeInclusive<i32> {
        self.min_y..=self.max_y
    }
}

impl std::fmt::Display for DataWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
