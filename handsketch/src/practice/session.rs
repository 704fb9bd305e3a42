//! One guided tracing run over a fitted template.

use tracing::{debug, info};

use super::geometry::Point;
use super::progress::{ProgressMode, ProgressStrategy};
use super::template::Template;
use crate::event::Event;
use crate::hand::CanvasSize;

/// Completion threshold slack for accumulated float increments.
const PROGRESS_EPSILON: f64 = 1e-9;

/// Tracing tolerances and progress settings.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Hit distance in canvas pixels.
    pub tolerance: f64,
    /// Progress needed to complete a step.
    pub min_completeness: f64,
    /// Credit per on-target sample in fixed mode.
    pub progress_increment: f64,
    pub progress_mode: ProgressMode,
    /// Scale the tolerance with the template fit scale.
    pub adaptive_tolerance: bool,
    /// Let triangles and curves be traced.
    pub match_open_shapes: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            tolerance: 50.0,
            min_completeness: 0.5,
            progress_increment: 0.1,
            progress_mode: ProgressMode::Fixed,
            adaptive_tolerance: false,
            match_open_shapes: false,
        }
    }
}

/// Tracing run: current step, its progress, and what has been completed.
#[derive(Debug)]
pub struct TracingSession {
    template: Template,
    scale: f64,
    tolerance: f64,
    min_completeness: f64,
    match_open_shapes: bool,
    strategy: Box<dyn ProgressStrategy>,
    current_step: usize,
    progress: f64,
    completed: Vec<usize>,
    complete: bool,
}

impl TracingSession {
    /// Fit `template` to `canvas` and start at step 0.
    pub fn start(template: &Template, canvas: CanvasSize, config: &TracingConfig) -> Self {
        let fitted = template.fit_to_canvas(canvas);
        let tolerance = if config.adaptive_tolerance {
            config.tolerance * fitted.scale
        } else {
            config.tolerance
        };
        let complete = fitted.template.is_empty();
        info!(
            "Tracing '{}' ({} steps, tolerance {:.1})",
            fitted.template.name,
            fitted.template.len(),
            tolerance
        );
        Self {
            template: fitted.template,
            scale: fitted.scale,
            tolerance,
            min_completeness: config.min_completeness,
            match_open_shapes: config.match_open_shapes,
            strategy: config.progress_mode.strategy(config.progress_increment),
            current_step: 0,
            progress: 0.0,
            completed: Vec::new(),
            complete,
        }
    }

    /// Measure a drawn point against the current step.
    pub fn feed_point(&mut self, p: Point) -> Vec<Event> {
        if self.complete {
            return Vec::new();
        }
        let Some(step) = self.template.step(self.current_step) else {
            return Vec::new();
        };

        if !step.primitive.hits(p, self.tolerance, self.match_open_shapes) {
            self.strategy.reset();
            return Vec::new();
        }

        self.progress += self.strategy.credit(&step.primitive, p);
        debug!(
            "Step {} {} progress {:.2}",
            self.current_step,
            step.primitive.as_str(),
            self.progress
        );
        if self.progress + PROGRESS_EPSILON >= self.min_completeness {
            self.complete_step()
        } else {
            Vec::new()
        }
    }

    /// Complete the current step unconditionally.
    pub fn skip_step(&mut self) -> Vec<Event> {
        if self.complete {
            return Vec::new();
        }
        debug!("Skipping step {}", self.current_step);
        self.complete_step()
    }

    /// Start over on the same fitted template.
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.progress = 0.0;
        self.completed.clear();
        self.complete = self.template.is_empty();
        self.strategy.reset();
    }

    fn complete_step(&mut self) -> Vec<Event> {
        let total = self.template.len();
        let step = self.current_step;
        self.completed.push(step);
        self.current_step += 1;
        self.progress = 0.0;
        self.strategy.reset();

        let mut events = vec![Event::StepCompleted { step, total }];
        if self.current_step >= total {
            self.complete = true;
            info!("Template '{}' complete", self.template.name);
            events.push(Event::TemplateCompleted);
        }
        events
    }

    /// Fitted template in canvas coordinates.
    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Effective hit tolerance in canvas pixels.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn completed_steps(&self) -> &[usize] {
        &self.completed
    }

    pub fn total_steps(&self) -> usize {
        self.template.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Generate s-expression for status.
    pub fn status_sexp(&self) -> String {
        let completed: Vec<String> = self.completed.iter().map(|i| i.to_string()).collect();
        format!(
            "(:template \"{}\" :step {} :total {} :progress {:.2} :completed ({}) :complete {} :tolerance {:.1} :scale {:.3} :progress-mode {})",
            crate::sexp::escape_string(&self.template.name),
            self.current_step,
            self.template.len(),
            self.progress,
            completed.join(" "),
            crate::sexp::bool_sexp(self.complete),
            self.tolerance,
            self.scale,
            self.strategy.name(),
        )
    }
}
