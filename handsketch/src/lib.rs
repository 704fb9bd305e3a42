//! handsketch: drawing by hand gesture.
//!
//! Per-frame hand landmarks are classified into gestures, debounced by a
//! hold/cooldown state machine into drawing events, and optionally scored
//! against a guided tracing template.

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod hand;
pub mod practice;
pub mod replay;
pub mod sexp;
pub mod tools;

pub use config::SketchConfig;
pub use controller::Controller;
pub use error::{Error, Result};
pub use event::Event;
