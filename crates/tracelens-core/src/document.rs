#![forbid(unsafe_code)]

//! Input-document shape and parsing.
//!
//! A report document carries one metadata array shared across all runs
//! and one raw event sequence per run:
//!
//! ```json
//! {
//!   "events": [ {"name": "script.start"}, {"name": "glx.info", "statistic": true} ],
//!   "logs": [ [ [1500000000000000, "script.start"], ... ], ... ]
//! }
//! ```
//!
//! Parsing is all-or-nothing: a malformed document yields
//! [`LoadError::Malformed`] and no partial state.

use serde::Deserialize;

use crate::error::LoadError;
use crate::event::{Event, EventMeta};
use crate::run::Run;

/// A decoded report document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    /// Metadata for every event name, shared across runs.
    pub events: Vec<EventMeta>,
    /// One raw event sequence per recorded run.
    pub logs: Vec<Vec<Event>>,
}

impl Document {
    /// Parse a report from its JSON text.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let document: Document = serde_json::from_str(text)?;
        tracing::debug!(
            event_names = document.events.len(),
            runs = document.logs.len(),
            "parsed report document"
        );
        Ok(document)
    }

    /// Split the document into its metadata and one unprepared
    /// [`Run`] per log.
    #[must_use]
    pub fn into_runs(self) -> (Vec<EventMeta>, Vec<Run>) {
        let runs = self.logs.into_iter().map(Run::new).collect();
        (self.events, runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "events": [
            {"name": "script.start"},
            {"name": "glx.info", "statistic": true}
        ],
        "logs": [
            [[1500000000000000, "script.start"], [1500000000500000, "glx.info", 3]],
            [[1500000001000000, "script.start"]]
        ]
    }"#;

    #[test]
    fn parses_sample_document() {
        let document = Document::parse(SAMPLE).unwrap();
        assert_eq!(document.events.len(), 2);
        assert_eq!(document.logs.len(), 2);
        assert_eq!(document.logs[0][1].value, Some(3.0));
    }

    #[test]
    fn into_runs_keeps_every_log() {
        let (metadata, runs) = Document::parse(SAMPLE).unwrap().into_runs();
        assert_eq!(metadata.len(), 2);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1].len(), 1);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = Document::parse("{not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn shape_mismatch_is_malformed() {
        let err = Document::parse(r#"{"events": 5, "logs": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn missing_logs_is_malformed() {
        let err = Document::parse(r#"{"events": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn empty_document_is_valid() {
        let document = Document::parse(r#"{"events": [], "logs": []}"#).unwrap();
        let (metadata, runs) = document.into_runs();
        assert!(metadata.is_empty());
        assert!(runs.is_empty());
    }
}
