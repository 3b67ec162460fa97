#![forbid(unsafe_code)]

//! Full-surface timeline redraw.
//!
//! [`TimelineRenderer`] paints one prepared [`Run`] through the
//! current [`Viewport`]: a minimap scroll column on the left edge, a
//! script-event column and a detail-event column driven by two
//! [`LabelLayout`] engines, an inferred frame-swap interval overlay,
//! and an adaptive time axis. Redraw is a pure function of run and
//! viewport; each pass returns a fresh [`Frame`] describing the
//! scroll handle and the collapsed-label tooltip regions, replacing
//! whatever the previous pass produced.

use tracing::trace;

use tracelens_core::{Event, Run, SWAP_COMPLETE, Viewport};

use crate::geometry::RectF;
use crate::layout::{ColumnSink, LABEL_SEPARATION, LabelGroup, LabelLayout};
use crate::surface::{Rgba, Surface, TextAlign, TextBaseline};

/// Hit-test geometry produced by one redraw pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// The scrollbar handle in surface pixels.
    pub scroll_handle: RectF,
    /// Tooltip regions for collapsed label groups, in paint order.
    pub regions: Vec<TooltipRegion>,
}

/// A hoverable rectangle listing the names hidden behind one
/// collapsed label.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRegion {
    /// Region covered by the placeholder label.
    pub rect: RectF,
    /// Names of the folded events, in log order.
    pub names: Vec<String>,
}

impl TooltipRegion {
    /// Whether the given surface point lies inside the region.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.rect.contains(x, y)
    }
}

/// Paints a prepared run onto an abstract surface.
#[derive(Debug, Clone)]
pub struct TimelineRenderer {
    scroll_width: f64,
    separation: f64,
    scroll_color: Rgba,
    script_color: Rgba,
    vblank_color: Rgba,
    scale_color: Rgba,
    message_color: Rgba,
}

impl Default for TimelineRenderer {
    fn default() -> Self {
        Self {
            scroll_width: 20.0,
            separation: LABEL_SEPARATION,
            scroll_color: Rgba::rgb(0xff, 0x88, 0x44),
            script_color: Rgba::rgb(0x00, 0x00, 0xff),
            vblank_color: Rgba::rgb(0xff, 0x88, 0x00),
            scale_color: Rgba::rgb(0x44, 0x44, 0x44),
            message_color: Rgba::rgb(0x88, 0x88, 0x88),
        }
    }
}

/// Per-column drawing parameters for a [`ColumnPass`].
#[derive(Debug, Clone, Copy)]
struct ColumnStyle {
    line_x: f64,
    line_width: f64,
    label_x: f64,
    align: TextAlign,
    color: Option<Rgba>,
    dedup_lines: bool,
}

/// A [`ColumnSink`] that draws one engine's decisions onto the
/// surface and records tooltip regions for collapsed groups.
struct ColumnPass<'s> {
    surface: &'s mut dyn Surface,
    style: ColumnStyle,
    regions: &'s mut Vec<TooltipRegion>,
    last_line_y: &'s mut Option<f64>,
    separation: f64,
}

impl ColumnSink for ColumnPass<'_> {
    fn line(&mut self, pos: f64) {
        if !(self.style.dedup_lines && *self.last_line_y == Some(pos)) {
            if let Some(color) = self.style.color {
                self.surface.save();
                self.surface.set_fill_style(color);
                self.surface
                    .fill_rect(self.style.line_x, pos, self.style.line_width, 1.0);
                self.surface.restore();
            } else {
                self.surface
                    .fill_rect(self.style.line_x, pos, self.style.line_width, 1.0);
            }
        }
        *self.last_line_y = Some(pos);
    }

    fn label(&mut self, pos: f64, text: &str, group: Option<&LabelGroup>) {
        self.surface.save();
        if let Some(color) = self.style.color {
            self.surface.set_fill_style(color);
        }
        self.surface.set_text_align(self.style.align);
        self.surface.fill_text(text, self.style.label_x, pos);
        if let Some(group) = group {
            let width = self.surface.measure_text(text);
            let x = match self.style.align {
                TextAlign::Right => self.style.label_x - width,
                _ => self.style.label_x,
            };
            self.regions.push(TooltipRegion {
                rect: RectF::new(x, pos - self.separation / 2.0, width, self.separation),
                names: group.names.clone(),
            });
        }
        self.surface.restore();
    }
}

/// Step one layout engine for log index `i`, stopping it for good
/// once its position passes the bottom of the surface.
#[allow(clippy::too_many_arguments)]
fn step_engine<P, M>(
    engine: &mut LabelLayout<'_, P, M>,
    i: usize,
    done: &mut bool,
    height: f64,
    style: ColumnStyle,
    surface: &mut dyn Surface,
    regions: &mut Vec<TooltipRegion>,
    last_line_y: &mut Option<f64>,
    separation: f64,
) where
    P: Fn(&Event) -> bool,
    M: Fn(f64) -> f64,
{
    if *done || engine.index() != Some(i) {
        return;
    }
    let mut sink = ColumnPass {
        surface,
        style,
        regions,
        last_line_y,
        separation,
    };
    match engine.pos() {
        Some(pos) if pos >= height => {
            engine.finish(&mut sink);
            *done = true;
        }
        Some(pos) => {
            if pos >= 0.0 {
                engine.paint(&mut sink);
            }
            engine.advance(&mut sink);
        }
        None => *done = true,
    }
}

impl TimelineRenderer {
    /// Create a renderer with the default palette and metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of the minimap scroll column, in pixels.
    #[must_use]
    pub fn scroll_width(&self) -> f64 {
        self.scroll_width
    }

    /// Repaint the whole surface for `run` as seen through
    /// `viewport`, returning the hit-test geometry of the new frame.
    pub fn redraw(&self, run: &Run, viewport: Viewport, surface: &mut dyn Surface) -> Frame {
        let width = surface.width();
        let height = surface.height();
        let range = run.range();
        let window = viewport.width();

        surface.clear();
        surface.set_text_baseline(TextBaseline::Middle);

        // Degenerate runs still clear the surface but draw nothing.
        if run.is_empty() || range <= 0.0 || window <= 0.0 {
            return Frame::default();
        }

        let handle = RectF::new(
            0.0,
            (height * viewport.start() / range).round(),
            self.scroll_width,
            (height * window / range).round(),
        );

        surface.save();
        surface.fill_rect(self.scroll_width, 0.0, 1.0, height);
        surface.fill_rect(0.0, handle.y - 1.0, self.scroll_width, 1.0);
        surface.fill_rect(0.0, handle.bottom(), self.scroll_width, 1.0);
        surface.set_fill_style(self.scroll_color);
        surface.fill_rect(handle.x, handle.y, handle.width, handle.height);
        surface.restore();

        // Minimap: one tick per pixel row touched by any event.
        let mut last_row = None;
        for event in run.log() {
            let y = (height * event.time / range).floor();
            if last_row != Some(y) {
                surface.fill_rect(0.0, y, self.scroll_width, 1.0);
                last_row = Some(y);
            }
        }

        let script_style = ColumnStyle {
            line_x: width / 4.0,
            line_width: width / 4.0,
            label_x: width / 4.0 - 5.0,
            align: TextAlign::Right,
            color: Some(self.script_color),
            dedup_lines: false,
        };
        let detail_style = ColumnStyle {
            line_x: width / 4.0,
            line_width: width / 4.0,
            label_x: width / 2.0 + 5.0,
            align: TextAlign::Left,
            color: None,
            dedup_lines: true,
        };

        let mut script = LabelLayout::new(
            run.log(),
            |e: &Event| e.name.starts_with("script."),
            |t| viewport.y_of(t, height),
            self.separation,
        );
        let mut detail = LabelLayout::new(
            run.log(),
            |e: &Event| !e.name.starts_with("script."),
            |t| viewport.y_of(t, height),
            self.separation,
        );

        let mut regions = Vec::new();
        let mut last_line_y = None;
        let mut script_done = false;
        let mut detail_done = false;

        // Swap completions are tracked over the whole log, even past
        // the point where both columns have stopped painting.
        let mut prev_swap = None;
        let mut last_swap = None;

        for (i, event) in run.log().iter().enumerate() {
            step_engine(
                &mut detail,
                i,
                &mut detail_done,
                height,
                detail_style,
                surface,
                &mut regions,
                &mut last_line_y,
                self.separation,
            );
            step_engine(
                &mut script,
                i,
                &mut script_done,
                height,
                script_style,
                surface,
                &mut regions,
                &mut last_line_y,
                self.separation,
            );

            if event.name == SWAP_COMPLETE
                && let Some(value) = event.value
                && value != 0.0
            {
                prev_swap = last_swap;
                last_swap = Some(value);
            }
        }

        if !detail_done {
            let mut sink = ColumnPass {
                surface: &mut *surface,
                style: detail_style,
                regions: &mut regions,
                last_line_y: &mut last_line_y,
                separation: self.separation,
            };
            detail.finish(&mut sink);
        }
        if !script_done {
            let mut sink = ColumnPass {
                surface: &mut *surface,
                style: script_style,
                regions: &mut regions,
                last_line_y: &mut last_line_y,
                separation: self.separation,
            };
            script.finish(&mut sink);
        }

        self.draw_swap_overlay(viewport, surface, prev_swap, last_swap);
        self.draw_axis(viewport, surface);

        trace!(regions = regions.len(), "redraw complete");

        Frame {
            scroll_handle: handle,
            regions,
        }
    }

    /// Draw the inferred frame-swap interval as repeating ticks in
    /// the detail column.
    ///
    /// The gap between two consecutive swap completions is assumed to
    /// be a whole multiple of the display refresh period, taken as
    /// 60 Hz. Ticks are drawn only when the inferred period is wide
    /// enough to resolve at the current zoom.
    fn draw_swap_overlay(
        &self,
        viewport: Viewport,
        surface: &mut dyn Surface,
        prev_swap: Option<f64>,
        last_swap: Option<f64>,
    ) {
        let (Some(prev), Some(last)) = (prev_swap, last_swap) else {
            return;
        };
        let width = surface.width();
        let height = surface.height();
        let window = viewport.width();

        let raw = last - prev;
        let multiple = (raw * 60.0).round().max(1.0);
        let interval = raw / multiple;
        if interval <= window / 20.0 {
            return;
        }

        surface.save();
        surface.set_fill_style(self.vblank_color);
        let mut t = last + interval * ((viewport.start() - last) / interval).floor();
        while t <= viewport.end() {
            let y = viewport.y_of(t, height);
            surface.fill_rect(3.0 * width / 4.0, y, width / 4.0, 1.0);
            t += interval;
        }
        surface.restore();
    }

    /// Draw the adaptive time axis on the right.
    ///
    /// The tick spacing is the smallest of 1, 2 or 5 times a power of
    /// ten that still leaves at most ten ticks across the window.
    fn draw_axis(&self, viewport: Viewport, surface: &mut dyn Surface) {
        let width = surface.width();
        let height = surface.height();
        let window = viewport.width();

        let min_tick = window / 10.0;
        let pow10 = min_tick.log10().floor();
        let tick10 = 10f64.powf(pow10);
        let mut digits = (-pow10) as i32;
        let tick = if tick10 >= min_tick {
            tick10
        } else if 2.0 * tick10 >= min_tick {
            2.0 * tick10
        } else if 5.0 * tick10 >= min_tick {
            5.0 * tick10
        } else {
            digits -= 1;
            10.0 * tick10
        };
        let precision = digits.max(0) as usize;

        let start = tick * (viewport.start() / tick).floor();
        let count = (window / tick).ceil() as usize;

        surface.save();
        surface.set_fill_style(self.scale_color);
        for i in 0..count {
            let t = start + i as f64 * tick;
            let y = viewport.y_of(t, height);

            let text = format!("{t:.precision$}");
            let text_width = surface.measure_text(&text);

            let x0 = 7.0 * width / 8.0 - text_width / 2.0;
            let x1 = 7.0 * width / 8.0 + text_width / 2.0;

            surface.fill_text(&text, x0, y);
            surface.fill_rect(3.0 * width / 4.0, y, x0 - 3.0 * width / 4.0 - 5.0, 1.0);
            surface.fill_rect(x1 + 5.0, y, width - x1 - 5.0, 1.0);
        }
        surface.restore();
    }

    /// Clear the surface and draw a single centered status message.
    pub fn show_message(&self, surface: &mut dyn Surface, message: &str) {
        let width = surface.width();
        let height = surface.height();

        surface.clear();
        surface.save();
        surface.set_font("50px sans-serif");
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.set_fill_style(self.message_color);
        surface.fill_text(message, width / 2.0, height / 2.0);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::COLLAPSED_LABEL;
    use crate::recording::{DrawOp, RecordingSurface};
    use tracelens_core::{Document, EventMeta};

    fn prepared_run(entries: &[(f64, &str, Option<f64>)]) -> Run {
        let log: Vec<Event> = entries
            .iter()
            .map(|&(time, name, value)| Event {
                // Raw times are microseconds since the epoch.
                time: time * 1e6 + 1_000_000_000.0,
                name: name.to_string(),
                value,
            })
            .collect();
        let mut run = Run::new(log);
        run.prepare(&[]);
        run
    }

    fn sample_run() -> Run {
        prepared_run(&[
            (0.0, "script.start", None),
            (1.0, "clutter.paint", None),
            (2.5, "script.stop", None),
            (3.0, "glx.idle", None),
        ])
    }

    #[test]
    fn empty_run_clears_and_returns_empty_frame() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let mut run = Run::new(Vec::new());
        run.prepare(&[]);

        let frame = renderer.redraw(&run, Viewport::full(0.0), &mut surface);

        assert_eq!(frame, Frame::default());
        assert_eq!(surface.ops(), &[DrawOp::Clear]);
    }

    #[test]
    fn scroll_handle_tracks_viewport() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[(0.0, "a", None), (10.0, "b", None)]);

        let frame = renderer.redraw(&run, Viewport::new(2.5, 7.5), &mut surface);

        assert_eq!(frame.scroll_handle, RectF::new(0.0, 125.0, 20.0, 250.0));
        // The handle is the only rect drawn in the scrollbar color.
        assert_eq!(
            surface.rect_count_with_style(Rgba::rgb(0xff, 0x88, 0x44)),
            1
        );
    }

    #[test]
    fn script_events_go_left_detail_events_go_right() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = sample_run();

        renderer.redraw(&run, Viewport::full(run.range()), &mut surface);

        let texts: Vec<(&str, f64, TextAlign)> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, x, align, .. } => Some((text.as_str(), *x, *align)),
                _ => None,
            })
            .filter(|(text, ..)| !text.chars().all(|c| c.is_ascii_digit() || c == '.'))
            .collect();

        assert!(texts.contains(&("script.start", 95.0, TextAlign::Right)));
        assert!(texts.contains(&("script.stop", 95.0, TextAlign::Right)));
        assert!(texts.contains(&("clutter.paint", 205.0, TextAlign::Left)));
    }

    #[test]
    fn crowded_events_produce_tooltip_regions() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[
            (0.0, "clutter.stagePaintStart", None),
            (0.001, "clutter.paintCompletedTimestamp", None),
            (0.002, "clutter.stagePaintDone", None),
            (4.8, "mutter.frameTimestamp", None),
            (4.801, "glx.swapComplete", None),
            (5.001, "a.end", None),
        ]);

        let frame = renderer.redraw(&run, Viewport::full(run.range()), &mut surface);

        assert_eq!(frame.regions.len(), 2);
        assert_eq!(
            frame.regions[0].names,
            vec![
                "clutter.stagePaintStart",
                "clutter.paintCompletedTimestamp",
                "clutter.stagePaintDone",
            ]
        );
        assert_eq!(frame.regions[1].names.len(), 2);

        // Each region sits at its placeholder, one separation tall.
        let placeholder = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::FillText { text, x, .. } if text == COLLAPSED_LABEL => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(placeholder, 205.0);
        assert_eq!(frame.regions[0].rect.height, LABEL_SEPARATION);
        assert_eq!(frame.regions[0].rect.x, 205.0);
    }

    #[test]
    fn regions_are_rebuilt_each_pass() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[
            (0.0, "a.one", None),
            (0.001, "a.two", None),
            (5.0, "b.one", None),
        ]);

        let first = renderer.redraw(&run, Viewport::full(run.range()), &mut surface);
        assert_eq!(first.regions.len(), 1);

        // Zoomed in, the crowd spreads out and the group disappears.
        let second = renderer.redraw(&run, Viewport::new(0.0, 0.01), &mut surface);
        assert!(second.regions.is_empty());
    }

    fn raw_micros(t: f64) -> f64 {
        t * 1e6 + 1_000_000_000.0
    }

    /// A one-second run with five swap completions 1/60s apart.
    fn swap_run() -> Run {
        let mut log = vec![Event::new(raw_micros(0.0), "a")];
        for i in 0..5 {
            let t = 0.1 + i as f64 / 60.0;
            log.push(Event::new(raw_micros(t), SWAP_COMPLETE).with_value(raw_micros(t)));
        }
        log.push(Event::new(raw_micros(1.0), "b"));
        let mut run = Run::new(log);
        run.prepare(&[]);
        run
    }

    #[test]
    fn swap_overlay_draws_ticks_when_zoomed_in() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = swap_run();

        // A 0.1s window: the 1/60s interval passes the 1/20 guard.
        renderer.redraw(&run, Viewport::new(0.05, 0.15), &mut surface);

        let ticks = surface.rect_count_with_style(Rgba::rgb(0xff, 0x88, 0x00));
        // 0.1s window at 1/60s spacing gives six or seven ticks.
        assert!((6..=7).contains(&ticks), "got {ticks} overlay ticks");
    }

    #[test]
    fn swap_overlay_suppressed_when_interval_too_small() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = swap_run();

        // Across the full 1s window, 1/60 is under 1/20 of the range.
        renderer.redraw(&run, Viewport::full(run.range()), &mut surface);

        assert_eq!(surface.rect_count_with_style(Rgba::rgb(0xff, 0x88, 0x00)), 0);
    }

    #[test]
    fn swaps_without_values_draw_no_overlay() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[
            (0.0, "glx.swapComplete", None),
            (0.2, "glx.swapComplete", None),
            (0.4, "a", None),
        ]);

        renderer.redraw(&run, Viewport::full(run.range()), &mut surface);
        assert_eq!(surface.rect_count_with_style(Rgba::rgb(0xff, 0x88, 0x00)), 0);
    }

    fn axis_labels(surface: &RecordingSurface) -> Vec<String> {
        surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, style, .. }
                    if *style == Rgba::rgb(0x44, 0x44, 0x44) =>
                {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn axis_uses_whole_seconds_for_a_five_second_window() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[(0.0, "a", None), (5.001, "b", None)]);

        renderer.redraw(&run, Viewport::full(run.range()), &mut surface);

        assert_eq!(axis_labels(&surface), vec!["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn axis_adds_a_decimal_when_zoomed_to_one_second() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[(0.0, "a", None), (5.0, "b", None)]);

        renderer.redraw(&run, Viewport::new(1.0, 2.0), &mut surface);

        let labels = axis_labels(&surface);
        assert_eq!(labels.first().map(String::as_str), Some("1.0"));
        assert!(labels.contains(&"1.5".to_string()));
    }

    #[test]
    fn events_below_the_surface_are_not_painted() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let run = prepared_run(&[(0.0, "a.visible", None), (10.0, "a.hidden", None)]);

        // Window covers [0, 5]; the second event maps to y = 500.
        renderer.redraw(&run, Viewport::new(0.0, 5.0), &mut surface);

        let texts = surface.text_strings();
        assert!(texts.contains(&"a.visible"));
        assert!(!texts.contains(&"a.hidden"));
    }

    #[test]
    fn show_message_centers_the_text() {
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);

        renderer.show_message(&mut surface, "Loading...");

        assert_eq!(surface.ops().len(), 2);
        match &surface.ops()[1] {
            DrawOp::FillText {
                text,
                x,
                y,
                align,
                baseline,
                style,
            } => {
                assert_eq!(text, "Loading...");
                assert_eq!((*x, *y), (200.0, 250.0));
                assert_eq!(*align, TextAlign::Center);
                assert_eq!(*baseline, TextBaseline::Middle);
                assert_eq!(*style, Rgba::rgb(0x88, 0x88, 0x88));
            }
            other => panic!("expected FillText, got {other:?}"),
        }
    }

    #[test]
    fn redraw_works_on_a_parsed_document() {
        let text = r#"{
            "events": [{"name": "clutter.paint"}],
            "logs": [[
                [1000000000, "script.reload"],
                [1001000000, "clutter.paint"],
                [1002500000, "glx.swapComplete", 1002500000]
            ]]
        }"#;
        let document = Document::parse(text).unwrap();
        let (metadata, mut runs) = document.into_runs();
        assert_eq!(metadata, vec![EventMeta::plain("clutter.paint")]);

        runs[0].prepare(&metadata);
        let renderer = TimelineRenderer::new();
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let frame = renderer.redraw(&runs[0], Viewport::full(runs[0].range()), &mut surface);

        assert!(frame.scroll_handle.height > 0.0);
        assert!(surface.text_strings().contains(&"script.reload"));
    }
}
