//! Practice engine: template selection and the active tracing session.

use tracing::{info, warn};

use super::catalog::{Catalog, TemplateKind};
use super::geometry::Point;
use super::session::{TracingConfig, TracingSession};
use crate::error::Result;
use crate::event::Event;
use crate::hand::CanvasSize;

/// Externally visible engine state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TracingState {
    Inactive,
    Tracing { step: usize, progress: f64 },
    Complete,
}

impl TracingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Tracing { .. } => "tracing",
            Self::Complete => "complete",
        }
    }
}

/// Owns the catalog and at most one tracing session.
#[derive(Debug)]
pub struct PracticeEngine {
    pub config: TracingConfig,
    catalog: Catalog,
    canvas: CanvasSize,
    session: Option<TracingSession>,
    active: Option<(TemplateKind, String)>,
}

impl PracticeEngine {
    pub fn new(catalog: Catalog, config: TracingConfig, canvas: CanvasSize) -> Self {
        Self {
            config,
            catalog,
            canvas,
            session: None,
            active: None,
        }
    }

    /// Start tracing a catalog template.  On a lookup miss the current
    /// session is left untouched.
    pub fn start_template(&mut self, kind: TemplateKind, key: &str) -> Result<()> {
        let template = self.catalog.get(kind, key).map_err(|e| {
            warn!("Cannot start template: {}", e);
            e
        })?;
        self.session = Some(TracingSession::start(template, self.canvas, &self.config));
        self.active = Some((kind, key.to_string()));
        Ok(())
    }

    /// Feed a drawn point to the active session.
    pub fn feed_point(&mut self, p: Point) -> Vec<Event> {
        match self.session.as_mut() {
            Some(session) => session.feed_point(p),
            None => Vec::new(),
        }
    }

    pub fn skip_step(&mut self) -> Vec<Event> {
        match self.session.as_mut() {
            Some(session) => session.skip_step(),
            None => Vec::new(),
        }
    }

    /// Restart the active template from step 0.  Returns false when idle.
    pub fn restart(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                info!("Restarting '{}'", session.template().name);
                session.reset();
                true
            }
            None => false,
        }
    }

    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Stopped tracing '{}'", session.template().name);
        }
        self.active = None;
    }

    /// Canvas used for fitting.  An active session keeps its current fit
    /// until the template is started again.
    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    pub fn state(&self) -> TracingState {
        match &self.session {
            None => TracingState::Inactive,
            Some(s) if s.is_complete() => TracingState::Complete,
            Some(s) => TracingState::Tracing {
                step: s.current_step(),
                progress: s.progress(),
            },
        }
    }

    pub fn session(&self) -> Option<&TracingSession> {
        self.session.as_ref()
    }

    /// Kind and key of the active template.
    pub fn active(&self) -> Option<(TemplateKind, &str)> {
        self.active.as_ref().map(|(k, key)| (*k, key.as_str()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate s-expression for status.
    pub fn status_sexp(&self) -> String {
        match (&self.session, &self.active) {
            (Some(session), Some((kind, key))) => format!(
                "(:state :{} :kind :{} :key \"{}\" :session {})",
                self.state().as_str(),
                kind,
                crate::sexp::escape_string(key),
                session.status_sexp()
            ),
            _ => format!("(:state :{})", self.state().as_str()),
        }
    }
}
