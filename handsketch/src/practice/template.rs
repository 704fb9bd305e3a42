//! Guided drawing templates and canvas fitting.

use tracing::debug;

use super::geometry::{Bounds, Point, Primitive};
use crate::hand::CanvasSize;

/// Fraction of the canvas a fitted template may occupy on each axis.
pub const FIT_FRACTION: f64 = 0.6;

/// Largest upscale applied when fitting a small template.
pub const MAX_FIT_SCALE: f64 = 2.5;

/// One ordered step of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based drawing order.
    pub order: u32,
    pub primitive: Primitive,
}

/// Immutable named sequence of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    steps: Vec<Step>,
}

/// A template placed on a concrete canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTemplate {
    pub template: Template,
    /// Uniform scale applied from design space.
    pub scale: f64,
}

impl Template {
    /// Build from explicit steps, sorted by drawing order.
    pub fn new(name: impl Into<String>, mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|s| s.order);
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Build from primitives listed in drawing order.
    pub fn from_primitives(name: impl Into<String>, primitives: Vec<Primitive>) -> Self {
        let steps = primitives
            .into_iter()
            .zip(1u32..)
            .map(|(primitive, order)| Step { order, primitive })
            .collect();
        Self::new(name, steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Union of all step bounds, `None` for an empty template.
    pub fn bounds(&self) -> Option<Bounds> {
        let b = self
            .steps
            .iter()
            .fold(Bounds::empty(), |acc, s| acc.union(&s.primitive.bounds()));
        (!b.is_empty()).then_some(b)
    }

    /// Scale and center the template on `canvas`.
    ///
    /// Scale is `min(0.6·W / w, 0.6·H / h, 2.5)`; a zero-extent axis does
    /// not constrain it.  The bounding box ends up centered.
    pub fn fit_to_canvas(&self, canvas: CanvasSize) -> FittedTemplate {
        let Some(bounds) = self.bounds() else {
            return FittedTemplate {
                template: self.clone(),
                scale: 1.0,
            };
        };

        let axis_scale = |avail: f64, extent: f64| {
            if extent > 0.0 {
                avail * FIT_FRACTION / extent
            } else {
                f64::INFINITY
            }
        };
        let scale = axis_scale(canvas.width, bounds.width())
            .min(axis_scale(canvas.height, bounds.height()))
            .min(MAX_FIT_SCALE);

        let offset = Point::new(
            (canvas.width - bounds.width() * scale) / 2.0 - bounds.min_x * scale,
            (canvas.height - bounds.height() * scale) / 2.0 - bounds.min_y * scale,
        );
        debug!(
            "Fitting '{}' to {}x{}: scale {:.3}",
            self.name, canvas.width, canvas.height, scale
        );

        let steps = self
            .steps
            .iter()
            .map(|s| Step {
                order: s.order,
                primitive: s.primitive.transformed(scale, offset),
            })
            .collect();
        FittedTemplate {
            template: Template {
                name: self.name.clone(),
                steps,
            },
            scale,
        }
    }
}
