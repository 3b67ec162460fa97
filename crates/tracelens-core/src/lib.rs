#![forbid(unsafe_code)]

//! Data model for the tracelens timeline viewer.
//!
//! This crate holds everything the renderer and viewer crates agree on:
//! decoded events and their metadata, the per-session [`Run`] with its
//! one-shot preprocessing pass, the zoomable time window ([`Viewport`]),
//! the input-document shape, and the load-error taxonomy.
//!
//! Nothing here draws or handles input; those concerns live in
//! `tracelens-render` and `tracelens-viewer`.

pub mod document;
pub mod error;
pub mod event;
pub mod run;
pub mod viewport;

pub use document::Document;
pub use error::LoadError;
pub use event::{Event, EventMeta, STATISTICS_COLLECTED, SWAP_COMPLETE};
pub use run::{Run, Statistic};
pub use viewport::Viewport;
