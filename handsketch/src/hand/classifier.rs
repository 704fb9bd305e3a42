//! Single-frame gesture classification.

use super::features::GestureFeatures;

/// Discrete gesture for one frame.  Exactly one label per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    /// Fingers curled, thumb folded.  Held to toggle the eraser.
    Fist,
    /// Open palm.  Advances color and spawns effects.
    AllExtended,
    /// Thumb and index tips together.  Cancels the stroke.
    Pinch,
    /// Index finger raised alone.  Draws.
    IndexPointing,
    /// Nothing recognized.
    Idle,
}

impl GestureLabel {
    /// String representation for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::AllExtended => "all-extended",
            Self::Pinch => "pinch",
            Self::IndexPointing => "index-pointing",
            Self::Idle => "idle",
        }
    }
}

/// Classify frame features.  Priority: Fist > AllExtended > Pinch >
/// IndexPointing > Idle.
pub fn classify(features: &GestureFeatures) -> GestureLabel {
    if features.is_fist {
        GestureLabel::Fist
    } else if features.is_all_extended {
        GestureLabel::AllExtended
    } else if features.is_pinch {
        GestureLabel::Pinch
    } else if features.is_index_pointing {
        GestureLabel::IndexPointing
    } else {
        GestureLabel::Idle
    }
}
