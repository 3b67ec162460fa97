#![forbid(unsafe_code)]

//! Interactive viewing for tracelens event logs.
//!
//! This crate hosts the user-facing half of the viewer:
//!
//! - [`input`] defines the pointer and wheel events the host feeds in;
//! - [`controller`] owns the zoom/pan state machine for the visible
//!   time window;
//! - [`viewer`] ties document loading, run selection, rendering and
//!   input routing together in [`LogViewer`].

pub mod controller;
pub mod input;
pub mod viewer;

pub use controller::{DragMode, ViewportController};
pub use input::{PointerButton, PointerEvent, PointerEventKind, WheelEvent};
pub use viewer::LogViewer;
