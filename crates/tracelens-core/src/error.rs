#![forbid(unsafe_code)]

//! Load-error taxonomy.
//!
//! Both variants are terminal for the load attempt that produced them:
//! the viewer shows a placeholder message and stays usable for a fresh
//! load. Layout and viewport code never sees these — it only receives
//! already-validated, normalized data.

use std::fmt;

/// Why a log document failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The transport reported a non-success outcome.
    Transport(String),
    /// The document failed to parse or did not match the expected shape.
    Malformed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Transport(msg) => write!(f, "transport failure: {msg}"),
            LoadError::Malformed(msg) => write!(f, "malformed log: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}
