#![forbid(unsafe_code)]

//! Canonical event types.
//!
//! An [`Event`] is one timestamped occurrence in a recorded run. On the
//! wire it is a JSON array `[time, name, value?]`, so deserialization is
//! hand-written over a sequence rather than derived from a map.
//!
//! Times arrive as absolute epoch microseconds and are rewritten in
//! place to float seconds relative to the run start by
//! [`Run::prepare`](crate::run::Run::prepare).

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};

/// Marker event appended every time the instrumented process collects
/// its statistics. Repeated statistic values are omitted upstream, so
/// preprocessing densifies the series at each of these ticks.
pub const STATISTICS_COLLECTED: &str = "perf.statisticsCollected";

/// Marker event recorded when a frame swap completes. Its value is an
/// epoch timestamp (microseconds), not a count, and is normalized the
/// same way event times are.
pub const SWAP_COMPLETE: &str = "glx.swapComplete";

/// A named, timestamped occurrence, optionally carrying a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Absolute epoch microseconds as decoded; relative float seconds
    /// after the owning run has been prepared.
    pub time: f64,

    /// Event kind, looked up against [`EventMeta`] by name.
    pub name: String,

    /// Kind-specific payload (a statistic sample, a timestamp, ...).
    pub value: Option<f64>,
}

impl Event {
    /// Create an event.
    #[must_use]
    pub fn new(time: f64, name: impl Into<String>) -> Self {
        Self {
            time,
            name: name.into(),
            value: None,
        }
    }

    /// Create an event carrying a value.
    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EventVisitor;

        impl<'de> Visitor<'de> for EventVisitor {
            type Value = Event;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an event array [time, name, value?]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Event, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let time: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let value: Option<f64> = seq.next_element()?;

                // Reject trailing elements so shape mismatches surface
                // as malformed documents instead of silent truncation.
                if seq.next_element::<serde_json::Value>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(Event { time, name, value })
            }
        }

        deserializer.deserialize_seq(EventVisitor)
    }
}

/// Per-event-name metadata supplied by the input document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct EventMeta {
    /// Event name this entry describes.
    pub name: String,

    /// True if events of this name carry a running statistic value.
    #[serde(default)]
    pub statistic: bool,
}

impl EventMeta {
    /// Create metadata for a plain (non-statistic) event name.
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statistic: false,
        }
    }

    /// Create metadata for a statistic-carrying event name.
    #[must_use]
    pub fn statistic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statistic: true,
        }
    }
}
