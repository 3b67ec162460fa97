#![forbid(unsafe_code)]

//! Rendering for the tracelens timeline viewer.
//!
//! This crate turns a prepared [`Run`](tracelens_core::Run) and a
//! [`Viewport`](tracelens_core::Viewport) into drawing-surface calls:
//!
//! - [`surface`] defines the abstract 2D canvas the renderer draws on;
//! - [`layout`] holds the label-layout engine that decides, per visible
//!   event, between an individual label, a collapsed group, and
//!   suppression;
//! - [`renderer`] orchestrates a full redraw pass and reports the
//!   scroll-affordance geometry and tooltip regions it produced;
//! - [`recording`] provides an in-memory surface for tests.

pub mod geometry;
pub mod layout;
pub mod recording;
pub mod renderer;
pub mod surface;

pub use geometry::RectF;
pub use layout::{COLLAPSED_LABEL, ColumnSink, LABEL_SEPARATION, LabelGroup, LabelLayout};
pub use recording::{DrawOp, RecordingSurface};
pub use renderer::{Frame, TimelineRenderer, TooltipRegion};
pub use surface::{Rgba, Surface, TextAlign, TextBaseline};
