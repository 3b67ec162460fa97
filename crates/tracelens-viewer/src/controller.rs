#![forbid(unsafe_code)]

//! Viewport zoom and drag state machine.
//!
//! [`ViewportController`] owns the visible time window for one run
//! and mutates it in response to wheel zooms and pointer drags. A
//! drag runs in one of three modes, picked from where the press
//! landed:
//!
//! - **Handle**: the press hit the scrollbar handle; moving the
//!   pointer moves the window proportionally to the full run range.
//! - **Trough**: the press hit the scroll column outside the handle;
//!   the window recenters on the press immediately and then follows
//!   the pointer.
//! - **Grab**: the press landed in the timeline body; the content
//!   follows the pointer, so the window moves the opposite way,
//!   scaled by the window width.
//!
//! Every mutation ends with a width-preserving clamp, so the window
//! never leaves `[0, range]` and zoom level survives panning.

use tracing::debug;

use tracelens_core::Viewport;
use tracelens_render::RectF;

use crate::input::PointerButton;

/// Base of the wheel zoom factor; three wheel notches scale by 1.5.
const WHEEL_ZOOM_BASE: f64 = 1.5;

/// How a drag interprets pointer movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Handle,
    Trough,
    Grab,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    mode: DragMode,
    origin_y: f64,
    origin_start: f64,
}

/// Zoom/pan state for one run's visible window.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    range: f64,
    height: f64,
    drag: Option<DragState>,
}

impl ViewportController {
    /// Start fully zoomed out over `range` seconds, mapped onto a
    /// surface `height` pixels tall.
    #[must_use]
    pub fn new(range: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::full(range),
            range,
            height,
            drag: None,
        }
    }

    /// The current visible window.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Discard all state and zoom fully out over a new run.
    pub fn reset(&mut self, range: f64, height: f64) {
        self.viewport = Viewport::full(range);
        self.range = range;
        self.height = height;
        self.drag = None;
    }

    /// Zoom by `scale` around the time under `pivot_y`, or around
    /// the vertical center of the surface when no pivot is given.
    pub fn zoom(&mut self, scale: f64, pivot_y: Option<f64>) {
        if self.height <= 0.0 {
            return;
        }
        let y = pivot_y.unwrap_or(self.height / 2.0);
        let pivot_time = self.viewport.time_at(y, self.height);
        self.viewport.zoom(scale, pivot_time, self.range);
    }

    /// Apply a wheel notch: scrolling away from the user zooms in.
    pub fn wheel(&mut self, delta: f64, y: f64) {
        self.zoom(WHEEL_ZOOM_BASE.powf(-delta / 3.0), Some(y));
    }

    /// Begin a drag at `(x, y)`, classifying it against the scroll
    /// `handle` from the last frame. Returns true when the window
    /// already moved (a trough press recenters immediately).
    pub fn begin_drag(&mut self, button: PointerButton, x: f64, y: f64, handle: &RectF) -> bool {
        if button != PointerButton::Primary || self.drag.is_some() {
            return false;
        }

        let mode = if x >= handle.x && x < handle.right() {
            if y >= handle.y && y < handle.bottom() {
                DragMode::Handle
            } else {
                DragMode::Trough
            }
        } else {
            DragMode::Grab
        };

        self.drag = Some(DragState {
            mode,
            origin_y: y,
            origin_start: self.viewport.start(),
        });
        debug!(?mode, y, "drag started");

        if mode == DragMode::Trough {
            self.drag_to(y);
            return true;
        }
        false
    }

    /// Follow the pointer to `y` while a drag is in progress.
    pub fn drag_to(&mut self, y: f64) {
        let Some(drag) = self.drag else {
            return;
        };
        if self.height <= 0.0 {
            return;
        }

        let new_start = match drag.mode {
            DragMode::Handle => {
                drag.origin_start + self.range * (y - drag.origin_y) / self.height
            }
            DragMode::Trough => self.range * y / self.height - self.viewport.width() / 2.0,
            DragMode::Grab => {
                drag.origin_start - self.viewport.width() * (y - drag.origin_y) / self.height
            }
        };
        self.viewport.shift_to(new_start, self.range);
    }

    /// Finish the drag at `y`. Returns true when a drag actually
    /// ended, i.e. the release matched an active primary-button drag.
    pub fn end_drag(&mut self, button: PointerButton, y: f64) -> bool {
        if button != PointerButton::Primary || self.drag.is_none() {
            return false;
        }
        self.drag_to(y);
        self.drag = None;
        debug!(y, "drag finished");
        true
    }

    /// Abort any drag in progress, leaving the window where it is.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
}
