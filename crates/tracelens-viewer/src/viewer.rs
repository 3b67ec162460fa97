#![forbid(unsafe_code)]

//! The top-level log viewer.
//!
//! [`LogViewer`] ties the pieces together: it parses an uploaded
//! document into runs, prepares the selected run, and routes pointer
//! and wheel input through the [`ViewportController`], redrawing
//! synchronously after every change. Load failures are terminal for
//! that attempt: a placeholder message is drawn and the viewer stays
//! ready for a fresh load.

use tracing::{debug, warn};

use tracelens_core::{Document, EventMeta, LoadError, Run, Viewport};
use tracelens_render::renderer::{Frame, TimelineRenderer, TooltipRegion};
use tracelens_render::surface::Surface;

use crate::controller::ViewportController;
use crate::input::{PointerEvent, PointerEventKind, WheelEvent};

/// An interactive, zoomable viewer over one uploaded log document.
pub struct LogViewer {
    metadata: Vec<EventMeta>,
    runs: Vec<Run>,
    current: Option<usize>,
    controller: ViewportController,
    renderer: TimelineRenderer,
    frame: Frame,
    hover: Option<usize>,
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogViewer {
    /// A viewer with no document loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: Vec::new(),
            runs: Vec::new(),
            current: None,
            controller: ViewportController::new(0.0, 0.0),
            renderer: TimelineRenderer::new(),
            frame: Frame::default(),
            hover: None,
        }
    }

    /// The runs decoded from the current document.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Index of the selected run, if a document is loaded.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The visible window, if a document is loaded.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.current.map(|_| self.controller.viewport())
    }

    /// The tooltip region under the pointer, if any.
    #[must_use]
    pub fn tooltip(&self) -> Option<&TooltipRegion> {
        self.hover.and_then(|i| self.frame.regions.get(i))
    }

    /// Show the placeholder drawn while a document fetch is pending.
    pub fn loading(&self, surface: &mut dyn Surface) {
        self.renderer.show_message(surface, "Loading...");
    }

    /// Report a failed document fetch. Any previously loaded document
    /// is kept untouched in memory but the surface shows the failure.
    pub fn load_failure(&self, surface: &mut dyn Surface) {
        warn!("log fetch failed");
        self.renderer.show_message(surface, "Couldn't load log");
    }

    /// Parse an uploaded document and select its first run.
    ///
    /// On any parse or shape error the surface shows a placeholder
    /// and the viewer's previous state is discarded only on success;
    /// nothing is partially rendered.
    pub fn load_document(
        &mut self,
        text: &str,
        surface: &mut dyn Surface,
    ) -> Result<(), LoadError> {
        let document = match Document::parse(text) {
            Ok(document) => document,
            Err(err) => {
                warn!(%err, "rejecting document");
                self.renderer.show_message(surface, "Malformed log");
                return Err(err);
            }
        };

        let (metadata, runs) = document.into_runs();
        if runs.is_empty() {
            let err = LoadError::Malformed("document contains no runs".into());
            warn!(%err, "rejecting document");
            self.renderer.show_message(surface, "Malformed log");
            return Err(err);
        }

        debug!(runs = runs.len(), events = metadata.len(), "document loaded");
        self.metadata = metadata;
        self.runs = runs;
        self.current = None;
        self.select_run(0, surface);
        Ok(())
    }

    /// Select and prepare the run at `index`, zooming fully out.
    /// Returns false when no such run exists.
    pub fn select_run(&mut self, index: usize, surface: &mut dyn Surface) -> bool {
        let Some(run) = self.runs.get_mut(index) else {
            return false;
        };
        run.prepare(&self.metadata);
        let range = run.range();
        self.current = Some(index);
        self.controller.reset(range, surface.height());
        self.redraw(surface);
        true
    }

    /// Route a pointer event, redrawing when the window moved.
    pub fn handle_pointer(&mut self, event: &PointerEvent, surface: &mut dyn Surface) {
        if self.current.is_none() {
            return;
        }
        match event.kind {
            PointerEventKind::Down(button) => {
                if self
                    .controller
                    .begin_drag(button, event.x, event.y, &self.frame.scroll_handle)
                {
                    self.redraw(surface);
                }
            }
            PointerEventKind::Move => {
                if self.controller.is_dragging() {
                    self.controller.drag_to(event.y);
                    self.redraw(surface);
                } else {
                    self.update_hover(event.x, event.y);
                }
            }
            PointerEventKind::Up(button) => {
                if self.controller.end_drag(button, event.y) {
                    self.redraw(surface);
                }
            }
        }
    }

    /// Route a wheel event: scrolling away from the user zooms in
    /// around the pointer row.
    pub fn handle_wheel(&mut self, event: &WheelEvent, surface: &mut dyn Surface) {
        if self.current.is_none() {
            return;
        }
        self.controller.wheel(event.delta, event.y);
        self.redraw(surface);
    }

    fn redraw(&mut self, surface: &mut dyn Surface) {
        if let Some(index) = self.current {
            self.frame = self
                .renderer
                .redraw(&self.runs[index], self.controller.viewport(), surface);
            self.hover = None;
        }
    }

    fn update_hover(&mut self, x: f64, y: f64) {
        self.hover = self
            .frame
            .regions
            .iter()
            .position(|region| region.contains(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerButton;
    use tracelens_render::recording::{DrawOp, RecordingSurface};

    const TWO_EVENT_DOC: &str = r#"{
        "events": [],
        "logs": [[
            [1000000000, "script.start"],
            [1010000000, "clutter.paint"]
        ]]
    }"#;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(400.0, 100.0)
    }

    fn message_drawn(surface: &RecordingSurface) -> Option<&str> {
        surface.ops().iter().find_map(|op| match op {
            DrawOp::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[test]
    fn loading_shows_a_placeholder() {
        let viewer = LogViewer::new();
        let mut surface = surface();
        viewer.loading(&mut surface);
        assert_eq!(message_drawn(&surface), Some("Loading..."));
    }

    #[test]
    fn fetch_failure_shows_a_placeholder() {
        let viewer = LogViewer::new();
        let mut surface = surface();
        viewer.load_failure(&mut surface);
        assert_eq!(message_drawn(&surface), Some("Couldn't load log"));
    }

    #[test]
    fn malformed_document_is_rejected() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();

        let result = viewer.load_document("{not json", &mut surface);
        assert!(matches!(result, Err(LoadError::Malformed(_))));
        assert_eq!(message_drawn(&surface), Some("Malformed log"));
        assert!(viewer.current().is_none());
    }

    #[test]
    fn document_without_runs_is_rejected() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();

        let result = viewer.load_document(r#"{"events": [], "logs": []}"#, &mut surface);
        assert!(matches!(result, Err(LoadError::Malformed(_))));
        assert_eq!(message_drawn(&surface), Some("Malformed log"));
    }

    #[test]
    fn loading_a_document_selects_the_first_run() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();

        viewer.load_document(TWO_EVENT_DOC, &mut surface).unwrap();

        assert_eq!(viewer.current(), Some(0));
        assert_eq!(viewer.viewport(), Some(Viewport::full(10.0)));
        assert!(viewer.runs()[0].is_prepared());
        // The redraw reached the surface.
        assert!(surface.ops().len() > 1);
    }

    #[test]
    fn selecting_a_missing_run_is_refused() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();
        viewer.load_document(TWO_EVENT_DOC, &mut surface).unwrap();

        assert!(!viewer.select_run(5, &mut surface));
        assert_eq!(viewer.current(), Some(0));
    }

    #[test]
    fn wheel_zooms_around_the_pointer_row() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();
        viewer.load_document(TWO_EVENT_DOC, &mut surface).unwrap();

        viewer.handle_wheel(&WheelEvent::new(-3.0, 50.0), &mut surface);

        let viewport = viewer.viewport().unwrap();
        assert!((viewport.width() - 10.0 / 1.5).abs() < 1e-9);
        // The pivot row stays on the same time.
        assert!((viewport.time_at(50.0, 100.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn grab_drag_pans_and_redraws() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();
        viewer.load_document(TWO_EVENT_DOC, &mut surface).unwrap();
        viewer.handle_wheel(&WheelEvent::new(-3.0, 50.0), &mut surface);
        let before = viewer.viewport().unwrap();

        viewer.handle_pointer(
            &PointerEvent::down(PointerButton::Primary, 200.0, 50.0),
            &mut surface,
        );
        viewer.handle_pointer(&PointerEvent::moved(200.0, 30.0), &mut surface);
        viewer.handle_pointer(
            &PointerEvent::up(PointerButton::Primary, 200.0, 30.0),
            &mut surface,
        );

        let after = viewer.viewport().unwrap();
        assert!(after.start() > before.start());
        assert!((after.width() - before.width()).abs() < 1e-9);
    }

    #[test]
    fn input_is_ignored_without_a_document() {
        let mut viewer = LogViewer::new();
        let mut surface = surface();

        viewer.handle_wheel(&WheelEvent::new(-3.0, 50.0), &mut surface);
        viewer.handle_pointer(
            &PointerEvent::down(PointerButton::Primary, 5.0, 5.0),
            &mut surface,
        );
        assert!(surface.ops().is_empty());
        assert!(viewer.viewport().is_none());
    }

    #[test]
    fn hovering_a_collapsed_group_exposes_its_names() {
        let mut viewer = LogViewer::new();
        // Tall surface so event rows spread out like the real canvas.
        let mut surface = RecordingSurface::new(400.0, 500.0);
        let doc = r#"{
            "events": [],
            "logs": [[
                [1000000000, "a.one"],
                [1000001000, "a.two"],
                [1005000000, "b.mid"],
                [1010000000, "b.end"]
            ]]
        }"#;
        viewer.load_document(doc, &mut surface).unwrap();

        // The first two events are 0.001s apart: one collapsed group
        // whose placeholder sits at the top of the detail column.
        let region = viewer.tooltip();
        assert!(region.is_none());

        viewer.handle_pointer(&PointerEvent::moved(210.0, 3.0), &mut surface);
        let region = viewer.tooltip().expect("pointer is inside the region");
        assert_eq!(region.names, vec!["a.one", "a.two"]);

        viewer.handle_pointer(&PointerEvent::moved(210.0, 100.0), &mut surface);
        assert!(viewer.tooltip().is_none());
    }
}
