#![forbid(unsafe_code)]

//! Pointer and wheel input events.
//!
//! The viewer is wired to a generic pointer source; the host
//! translates whatever native events it receives into these types,
//! with coordinates already surface-relative.

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// The primary (usually left) button.
    Primary,
    /// The secondary (usually right) button.
    Secondary,
    /// The middle button.
    Auxiliary,
}

/// What a pointer event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// A button was pressed.
    Down(PointerButton),
    /// The pointer moved.
    Move,
    /// A button was released.
    Up(PointerButton),
}

/// A pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    /// A button press at the given position.
    #[must_use]
    pub fn down(button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Down(button),
            x,
            y,
        }
    }

    /// A pointer move to the given position.
    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Move,
            x,
            y,
        }
    }

    /// A button release at the given position.
    #[must_use]
    pub fn up(button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Up(button),
            x,
            y,
        }
    }
}

/// A scroll-wheel event at a vertical surface position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Signed scroll magnitude; positive scrolls toward the user.
    pub delta: f64,
    /// Vertical pointer position when the wheel turned.
    pub y: f64,
}

impl WheelEvent {
    #[must_use]
    pub fn new(delta: f64, y: f64) -> Self {
        Self { delta, y }
    }
}
