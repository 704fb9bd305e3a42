//! Hand landmark input and gesture recognition.
//!
//! - `landmarks`: the 21-point hand model and canvas mapping
//! - `features`: per-frame geometric predicates
//! - `classifier`: one label per frame
//! - `frame_clock`: frame intervals and pause detection
//! - `gesture`: hold and cooldown state machine producing events

pub mod classifier;
pub mod features;
pub mod frame_clock;
pub mod gesture;
pub mod landmarks;

pub use classifier::GestureLabel;
pub use gesture::{GestureConfig, GestureMachine};
pub use landmarks::{CanvasSize, HandLandmarks, Landmark, NormPoint};
