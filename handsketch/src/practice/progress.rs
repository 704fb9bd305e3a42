//! Progress crediting for on-target tracing samples.

use std::fmt;

use super::geometry::{Point, Primitive};

/// How on-target samples accumulate towards step completion.
pub trait ProgressStrategy: fmt::Debug {
    /// Short name for status output.
    fn name(&self) -> &'static str;

    /// Progress (fraction of the step) credited for an on-target sample.
    fn credit(&mut self, primitive: &Primitive, point: Point) -> f64;

    /// Forget per-step state.  Called on a miss and whenever the step changes.
    fn reset(&mut self) {}
}

/// Flat credit per on-target sample, regardless of movement.
#[derive(Debug, Clone)]
pub struct FixedIncrement {
    pub increment: f64,
}

impl Default for FixedIncrement {
    fn default() -> Self {
        Self { increment: 0.1 }
    }
}

impl ProgressStrategy for FixedIncrement {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn credit(&mut self, _primitive: &Primitive, _point: Point) -> f64 {
        self.increment
    }
}

/// Credits the distance between consecutive on-target samples as a
/// fraction of the outline length.  Holding still earns nothing.
#[derive(Debug, Clone, Default)]
pub struct ArcLength {
    last: Option<Point>,
}

impl ProgressStrategy for ArcLength {
    fn name(&self) -> &'static str {
        "arc-length"
    }

    fn credit(&mut self, primitive: &Primitive, point: Point) -> f64 {
        let outline = primitive.outline_length();
        let Some(last) = self.last.replace(point) else {
            return 0.0;
        };
        if outline <= 0.0 {
            return 0.0;
        }
        last.distance(point) / outline
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Selectable strategy, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    #[default]
    Fixed,
    ArcLength,
}

impl ProgressMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::ArcLength => "arc-length",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed),
            "arc-length" => Some(Self::ArcLength),
            _ => None,
        }
    }

    /// Build the strategy.  `increment` applies to `Fixed` only.
    pub fn strategy(&self, increment: f64) -> Box<dyn ProgressStrategy> {
        match self {
            Self::Fixed => Box::new(FixedIncrement { increment }),
            Self::ArcLength => Box::new(ArcLength::default()),
        }
    }
}
