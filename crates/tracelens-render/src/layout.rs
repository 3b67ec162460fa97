#![forbid(unsafe_code)]

//! Collision-avoiding label placement along a single column.
//!
//! [`LabelLayout`] walks one filtered view of an event log in time
//! order and decides, for each event, whether its name can be drawn
//! at its own position or must be folded into a collapsed group.
//! An event keeps its own label only when the nearest matching
//! neighbours on both sides are farther away than the separation
//! distance. Crowded neighbours accumulate into a pending group that
//! is emitted as a single `<...>` placeholder once the crowd ends or
//! enough vertical distance has passed.
//!
//! The engine carries a one-event lookahead so that crowding below
//! the current event is known before the paint decision is made.

use smallvec::SmallVec;

use tracelens_core::Event;

/// Minimum vertical distance, in pixels, between two drawn labels.
pub const LABEL_SEPARATION: f64 = 10.0;

/// Placeholder text drawn for a collapsed group of labels.
pub const COLLAPSED_LABEL: &str = "<...>";

/// A collapsed crowd of labels sharing one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGroup {
    /// Vertical position of the placeholder, in pixels.
    pub pos: f64,
    /// Names of the folded events, in log order.
    pub names: Vec<String>,
}

/// Receiver for the engine's drawing decisions.
pub trait ColumnSink {
    /// A tick line for an event at the given vertical position.
    fn line(&mut self, pos: f64);

    /// A label at the given vertical position. `group` is `Some` when
    /// the label is a collapsed placeholder.
    fn label(&mut self, pos: f64, text: &str, group: Option<&LabelGroup>);
}

struct DiscardSink;

impl ColumnSink for DiscardSink {
    fn line(&mut self, _pos: f64) {}
    fn label(&mut self, _pos: f64, _text: &str, _group: Option<&LabelGroup>) {}
}

/// Streaming label placer over one filtered view of an event log.
pub struct LabelLayout<'a, P, M>
where
    P: Fn(&Event) -> bool,
    M: Fn(f64) -> f64,
{
    log: &'a [Event],
    predicate: P,
    position: M,
    separation: f64,
    index: Option<usize>,
    next_index: Option<usize>,
    pos: Option<f64>,
    prev_pos: Option<f64>,
    next_pos: Option<f64>,
    pending: SmallVec<[&'a str; 4]>,
    anchor: f64,
}

impl<'a, P, M> LabelLayout<'a, P, M>
where
    P: Fn(&Event) -> bool,
    M: Fn(f64) -> f64,
{
    /// Create an engine over `log`, considering only events accepted
    /// by `predicate` and mapping times to pixels with `position`.
    /// The engine starts primed on the first matching event.
    pub fn new(log: &'a [Event], predicate: P, position: M, separation: f64) -> Self {
        let mut layout = Self {
            log,
            predicate,
            position,
            separation,
            index: None,
            next_index: None,
            pos: None,
            prev_pos: None,
            next_pos: None,
            pending: SmallVec::new(),
            anchor: 0.0,
        };
        layout.next_index = layout.scan_from(0);
        layout.next_pos = layout.next_index.map(|i| (layout.position)(layout.log[i].time));
        // Pending is empty, so priming cannot emit anything.
        layout.advance(&mut DiscardSink);
        layout
    }

    /// Index into the log of the current event, if any remain.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Vertical position of the current event, in pixels.
    #[must_use]
    pub fn pos(&self) -> Option<f64> {
        self.pos
    }

    fn scan_from(&self, start: usize) -> Option<usize> {
        self.log[start..]
            .iter()
            .position(|event| (self.predicate)(event))
            .map(|offset| start + offset)
    }

    /// Step to the next matching event. When the step enters a crowd
    /// from clear space, any pending group is flushed and the group
    /// anchor moves to the new position.
    pub fn advance(&mut self, sink: &mut dyn ColumnSink) {
        let Some(current) = self.next_index else {
            self.index = None;
            return;
        };

        self.prev_pos = self.pos;
        self.index = Some(current);
        self.pos = self.next_pos;
        self.next_index = self.scan_from(current + 1);
        self.next_pos = self.next_index.map(|i| (self.position)(self.log[i].time));

        if let (Some(pos), Some(next_pos)) = (self.pos, self.next_pos)
            && next_pos - pos <= self.separation
            && self.prev_pos.is_none_or(|prev| pos - prev > self.separation)
        {
            self.flush(sink);
            self.anchor = pos;
        }
    }

    /// Emit the drawing decision for the current event.
    pub fn paint(&mut self, sink: &mut dyn ColumnSink) {
        let (Some(index), Some(pos)) = (self.index, self.pos) else {
            return;
        };

        if !self.pending.is_empty() && pos - self.anchor >= 2.0 * self.separation {
            self.flush(sink);
            self.anchor += 2.0 * self.separation;
        }

        let clear_above = self.prev_pos.is_none_or(|prev| pos - prev > self.separation);
        let clear_below = self.next_pos.is_none_or(|next| next - pos > self.separation);

        if clear_above && clear_below {
            sink.label(pos, &self.log[index].name, None);
        } else {
            self.pending.push(&self.log[index].name);
            if self.next_index.is_none() {
                self.flush(sink);
            }
        }

        sink.line(pos);
    }

    /// Flush any pending group. Call once painting stops, whether the
    /// engine ran out of events or the pass ended early.
    pub fn finish(&mut self, sink: &mut dyn ColumnSink) {
        self.flush(sink);
    }

    fn flush(&mut self, sink: &mut dyn ColumnSink) {
        if self.pending.is_empty() {
            return;
        }
        let group = LabelGroup {
            pos: self.anchor + self.separation / 2.0,
            names: self.pending.iter().map(|name| name.to_string()).collect(),
        };
        self.pending.clear();
        sink.label(group.pos, COLLAPSED_LABEL, Some(&group));
    }
}
