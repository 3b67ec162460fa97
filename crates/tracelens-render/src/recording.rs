#![forbid(unsafe_code)]

//! An in-memory [`Surface`] that records draw calls.
//!
//! Tests assert against the recorded operation list instead of pixels.
//! Text measurement is deterministic: a fixed width per terminal
//! column, with wide characters counted via `unicode-width`.

use unicode_width::UnicodeWidthStr;

use crate::surface::{Rgba, Surface, TextAlign, TextBaseline};

/// Width assumed per text column when measuring, in pixels.
const COLUMN_WIDTH: f64 = 7.0;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// The surface was cleared.
    Clear,
    /// A filled rectangle, with the fill style active at draw time.
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: Rgba,
    },
    /// Drawn text, with the style state active at draw time.
    FillText {
        text: String,
        x: f64,
        y: f64,
        style: Rgba,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

#[derive(Debug, Clone, Copy)]
struct StyleState {
    fill: Rgba,
    align: TextAlign,
    baseline: TextBaseline,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            fill: Rgba::BLACK,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

/// A test surface recording every draw call.
#[derive(Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    state: StyleState,
    stack: Vec<StyleState>,
}

impl RecordingSurface {
    /// Create a recording surface of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            state: StyleState::default(),
            stack: Vec::new(),
        }
    }

    /// All recorded operations, in draw order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of rectangle fills drawn with the given style.
    #[must_use]
    pub fn rect_count_with_style(&self, style: Rgba) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { style: s, .. } if *s == style))
            .count()
    }

    /// The drawn label strings, in draw order.
    #[must_use]
    pub fn text_strings(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            style: self.state.fill,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            style: self.state.fill,
            align: self.state.align,
            baseline: self.state.baseline,
        });
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * COLUMN_WIDTH
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.state.fill = color;
    }

    fn set_font(&mut self, _font: &str) {}

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }
}
