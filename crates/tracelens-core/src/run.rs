#![forbid(unsafe_code)]

//! One recorded session of events, with its one-shot preprocessing pass.
//!
//! A [`Run`] owns the decoded event log for a session. [`Run::prepare`]
//! normalizes it exactly once:
//!
//! - event times are rewritten in place from absolute epoch
//!   microseconds to float seconds since the run's first event;
//! - statistic-carrying events update running min/max/current state,
//!   and every [`STATISTICS_COLLECTED`] tick expands the sparse samples
//!   into dense series aligned with [`Run::stat_times`];
//! - [`SWAP_COMPLETE`] values (which are timestamps) get the same
//!   epoch-to-relative conversion as event times;
//! - `range` is set to the last event's relative time.
//!
//! Preparation is memoized: a second call is a no-op, so already
//! relative times are never re-normalized.

use std::collections::BTreeMap;

use crate::event::{Event, EventMeta, STATISTICS_COLLECTED, SWAP_COMPLETE};

/// Microseconds per second, the unit conversion applied to raw times.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Running state for one statistic-carrying event name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistic {
    min: f64,
    max: f64,
    current: Option<f64>,
    values: Vec<f64>,
}

impl Statistic {
    /// Record one raw sample, updating min/max/current.
    fn record(&mut self, value: f64) {
        match self.current {
            None => {
                self.min = value;
                self.max = value;
            }
            Some(_) => {
                self.min = self.min.min(value);
                self.max = self.max.max(value);
            }
        }
        self.current = Some(value);
    }

    /// Append the current value to the dense series at a collection
    /// tick. A statistic with no sample yet records NaN so the series
    /// stays index-aligned with the run's collection times.
    fn sample(&mut self) {
        self.values.push(self.current.unwrap_or(f64::NAN));
    }

    /// Smallest sample seen, if any sample was recorded.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.current.map(|_| self.min)
    }

    /// Largest sample seen, if any sample was recorded.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.current.map(|_| self.max)
    }

    /// Most recent sample, if any.
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Dense sample series, one entry per collection tick.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// One recorded session: an ordered event log plus derived state.
///
/// The log is assumed pre-sorted by time and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    log: Vec<Event>,
    prepared: bool,
    start: Option<f64>,
    statistics: BTreeMap<String, Statistic>,
    stat_times: Vec<f64>,
    range: f64,
}

impl Run {
    /// Wrap a decoded, time-ascending event log.
    #[must_use]
    pub fn new(log: Vec<Event>) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Normalize times and derive statistics. Idempotent: the second
    /// and later calls return immediately.
    pub fn prepare(&mut self, metadata: &[EventMeta]) {
        if self.prepared {
            return;
        }
        self.prepared = true;

        for meta in metadata {
            if meta.statistic {
                self.statistics
                    .insert(meta.name.clone(), Statistic::default());
            }
        }

        let mut start: Option<f64> = None;
        let mut time = 0.0;

        for event in &mut self.log {
            match start {
                None => {
                    start = Some(event.time);
                    time = 0.0;
                    event.time = 0.0;
                }
                Some(s) => {
                    time = (event.time - s) / MICROS_PER_SECOND;
                    event.time = time;
                }
            }

            if let Some(statistic) = self.statistics.get_mut(&event.name)
                && let Some(value) = event.value
            {
                statistic.record(value);
            }

            if event.name == STATISTICS_COLLECTED {
                self.stat_times.push(time);
                for statistic in self.statistics.values_mut() {
                    statistic.sample();
                }
            }

            if event.name == SWAP_COMPLETE
                && let (Some(s), Some(value)) = (start, event.value)
            {
                event.value = Some((value - s) / MICROS_PER_SECOND);
            }
        }

        self.start = start;
        self.range = time;

        tracing::debug!(
            events = self.log.len(),
            range = self.range,
            statistics = self.statistics.len(),
            "prepared run"
        );
    }

    /// The normalized event log.
    #[must_use]
    pub fn log(&self) -> &[Event] {
        &self.log
    }

    /// True once [`Run::prepare`] has run.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Absolute epoch microseconds of the first event, if any.
    #[must_use]
    pub fn start(&self) -> Option<f64> {
        self.start
    }

    /// Duration of the run in seconds (zero for an empty run).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Derived statistics, keyed by event name.
    #[must_use]
    pub fn statistics(&self) -> &BTreeMap<String, Statistic> {
        &self.statistics
    }

    /// Collection-tick times, parallel to every statistic's series.
    #[must_use]
    pub fn stat_times(&self) -> &[f64] {
        &self.stat_times
    }

    /// Number of events in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// True if the log holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
