//! Guided template tracing.
//!
//! Templates are ordered lists of primitive shapes.  A session fits one to
//! the canvas and measures drawn points against the current step only,
//! advancing once enough on-target samples have accumulated.

pub mod catalog;
pub mod engine;
pub mod geometry;
pub mod progress;
pub mod session;
pub mod template;

pub use catalog::{Catalog, TemplateKind};
pub use engine::{PracticeEngine, TracingState};
pub use geometry::{Point, Primitive};
pub use progress::{ArcLength, FixedIncrement, ProgressMode, ProgressStrategy};
pub use session::{TracingConfig, TracingSession};
pub use template::{FittedTemplate, Step, Template};
