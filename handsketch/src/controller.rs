//! Per-session frame controller.
//!
//! Owns the gesture machine, the practice engine and the drawing tools,
//! and routes each frame's gesture events into tool and tracing updates.

use tracing::debug;

use crate::config::SketchConfig;
use crate::error::Result;
use crate::event::Event;
use crate::hand::{CanvasSize, GestureMachine, HandLandmarks};
use crate::practice::{Catalog, PracticeEngine, TemplateKind};
use crate::tools::DrawingTools;

/// Frame-driven drawing session.
pub struct Controller {
    gesture: GestureMachine,
    practice: PracticeEngine,
    tools: DrawingTools,
    canvas: CanvasSize,
}

impl Controller {
    pub fn new(config: SketchConfig, canvas: CanvasSize) -> Self {
        Self::with_catalog(config, canvas, Catalog::builtin())
    }

    pub fn with_catalog(config: SketchConfig, canvas: CanvasSize, catalog: Catalog) -> Self {
        let tools = DrawingTools::new(&config.tools);
        let mut gesture_config = config.gesture;
        gesture_config.palette_size = tools.palette().len();
        Self {
            gesture: GestureMachine::with_config(gesture_config),
            practice: PracticeEngine::new(catalog, config.tracing, canvas),
            tools,
            canvas,
        }
    }

    /// Process one camera frame.  `hand` is `None` when no hand was detected.
    pub fn process_frame(&mut self, hand: Option<&HandLandmarks>, now_ms: f64) -> Vec<Event> {
        let gesture_events = self.gesture.process_frame(hand, self.canvas, now_ms);
        let mut events = Vec::with_capacity(gesture_events.len());

        for event in gesture_events {
            let mut follow_up = Vec::new();
            match &event {
                Event::ToggleEraser => {
                    self.tools.toggle_eraser();
                }
                Event::AdvanceColor { index } => {
                    self.tools.set_color(*index);
                }
                Event::ExtendStroke { to, .. } if !self.tools.is_eraser() => {
                    follow_up = self.practice.feed_point((*to).into());
                }
                _ => {}
            }
            events.push(event);
            events.extend(follow_up);
        }

        if !events.is_empty() {
            debug!(
                "Frame at {:.0} ms: {}",
                now_ms,
                events.iter().map(|e| e.as_str()).collect::<Vec<_>>().join(", ")
            );
        }
        events
    }

    /// Process one frame of raw detector output.  Anything other than a
    /// full 21-point hand counts as no hand.
    pub fn process_landmarks(&mut self, pairs: Option<&[(f64, f64)]>, now_ms: f64) -> Vec<Event> {
        let hand = pairs.and_then(HandLandmarks::from_pairs);
        self.process_frame(hand.as_ref(), now_ms)
    }

    pub fn start_template(&mut self, kind: TemplateKind, key: &str) -> Result<()> {
        self.practice.start_template(kind, key)
    }

    pub fn stop_template(&mut self) {
        self.practice.stop();
    }

    pub fn restart_template(&mut self) -> bool {
        self.practice.restart()
    }

    pub fn skip_step(&mut self) -> Vec<Event> {
        self.practice.skip_step()
    }

    /// Select a palette color directly.  Leaves eraser mode.
    pub fn select_color(&mut self, index: usize) -> bool {
        let selected = self.tools.set_color(index);
        if selected {
            self.gesture.set_color_index(index);
        }
        selected
    }

    pub fn select_brush_size(&mut self, index: usize) -> bool {
        self.tools.select_brush_size(index)
    }

    pub fn select_eraser_size(&mut self, index: usize) -> bool {
        self.tools.select_eraser_size(index)
    }

    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        self.practice.set_canvas(canvas);
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn tools(&self) -> &DrawingTools {
        &self.tools
    }

    pub fn practice(&self) -> &PracticeEngine {
        &self.practice
    }

    pub fn gesture(&self) -> &GestureMachine {
        &self.gesture
    }

    /// Generate s-expression for status.
    pub fn status_sexp(&self, now_ms: f64) -> String {
        format!(
            "(:canvas (:width {:.0} :height {:.0}) :gesture {} :tools {} :practice {})",
            self.canvas.width,
            self.canvas.height,
            self.gesture.status_sexp(now_ms),
            self.tools.status_sexp(),
            self.practice.status_sexp(),
        )
    }
}
