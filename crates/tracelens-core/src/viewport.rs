#![forbid(unsafe_code)]

//! The visible time window over a run.
//!
//! A [`Viewport`] is a sub-interval of `[0, range]` in run-relative
//! seconds. All mutations preserve two invariants:
//!
//! 1. `0 <= start` and `end <= range` after clamping;
//! 2. clamping shifts the window to satisfy the bounds, it never
//!    shrinks it — the width is only changed by [`Viewport::zoom`].
//!
//! Pixel mapping helpers assume a vertical axis: time `start` maps to
//! row 0 and `end` to the surface height.

/// The currently visible time sub-range of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    start: f64,
    end: f64,
}

impl Viewport {
    /// Create a window over `[start, end]`.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The window covering an entire run.
    #[must_use]
    pub fn full(range: f64) -> Self {
        Self {
            start: 0.0,
            end: range,
        }
    }

    /// Start of the visible range, in run-relative seconds.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the visible range, in run-relative seconds.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Width of the visible range.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Shift the window back inside `[0, range]`, preserving width.
    pub fn clamp(&mut self, range: f64) {
        if self.start < 0.0 {
            self.end += -self.start;
            self.start = 0.0;
        } else if self.end > range {
            self.start -= self.end - range;
            self.end = range;
        }
    }

    /// Move the window so it starts at `new_start`, then re-clamp.
    pub fn shift_to(&mut self, new_start: f64, range: f64) {
        let width = self.width();
        self.start = new_start;
        self.end = new_start + width;
        self.clamp(range);
    }

    /// Scale the window by `1/scale` around `pivot_time` (a factor
    /// above one zooms in). A window that would grow wider than the
    /// run snaps to the full range. Non-finite or non-positive scales
    /// are ignored.
    pub fn zoom(&mut self, scale: f64, pivot_time: f64, range: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            return;
        }

        let factor = 1.0 / scale;
        self.start = self.start * factor + pivot_time * (1.0 - factor);
        self.end = self.end * factor + pivot_time * (1.0 - factor);

        if self.width() > range {
            self.start = 0.0;
            self.end = range;
        }
        self.clamp(range);
    }

    /// The time value under pixel row `y` of a surface `height` tall.
    #[must_use]
    pub fn time_at(&self, y: f64, height: f64) -> f64 {
        self.start + self.width() * y / height
    }

    /// The pixel row of time `t` on a surface `height` tall.
    #[must_use]
    pub fn y_of(&self, t: f64, height: f64) -> f64 {
        (height * (t - self.start) / self.width()).floor()
    }
}
