//! Per-frame geometric features derived from a 21-point hand.
//!
//! Pure functions: no state is carried between frames.  Palm smoothing
//! lives in the gesture machine, not here.

use super::landmarks::{CanvasSize, HandLandmarks, Landmark};

// ── Config ─────────────────────────────────────────────────

/// Thresholds for finger extension, flexion and pinch.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Minimum horizontal thumb tip to thumb MCP distance (normalized) for
    /// the thumb to count as extended.
    pub thumb_threshold: f64,
    /// Margin (normalized) a fingertip must rise above its PIP joint to
    /// count as extended.
    pub finger_margin: f64,
    /// Margin (normalized) a fingertip must sink below its PIP joint to
    /// count as bent.
    pub fist_margin: f64,
    /// Maximum thumb-to-index tip distance (canvas pixels) for a pinch.
    pub pinch_threshold_px: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            thumb_threshold: 0.06,
            finger_margin: 0.03,
            fist_margin: 0.02,
            pinch_threshold_px: 50.0,
        }
    }
}

// ── Features ───────────────────────────────────────────────

/// Features of a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureFeatures {
    pub thumb_extended: bool,
    /// Thumb plus extended non-thumb fingers (0-5).
    pub extended_finger_count: u8,
    pub is_fist: bool,
    pub is_pinch: bool,
    /// At least four fingers extended; tolerates one ambiguous finger.
    pub is_all_extended: bool,
    /// Index tip strictly above DIP, DIP above PIP, PIP above MCP.
    pub is_index_pointing: bool,
    /// Palm center in mirrored canvas pixels.
    pub palm_center: (f64, f64),
    /// Index fingertip in mirrored canvas pixels.
    pub index_tip: (f64, f64),
}

/// Thumb extension is lateral: compare tip and MCP x only.
pub fn thumb_extended(hand: &HandLandmarks, config: &FeatureConfig) -> bool {
    (hand.x(Landmark::ThumbTip) - hand.x(Landmark::ThumbMcp)).abs() > config.thumb_threshold
}

/// A non-thumb finger is extended when its tip is above the PIP joint by
/// more than the margin.
pub fn finger_extended(hand: &HandLandmarks, tip: Landmark, pip: Landmark, config: &FeatureConfig) -> bool {
    hand.y(tip) < hand.y(pip) - config.finger_margin
}

/// A non-thumb finger is bent when its tip is below the PIP joint by more
/// than the margin.
pub fn finger_bent(hand: &HandLandmarks, tip: Landmark, pip: Landmark, config: &FeatureConfig) -> bool {
    hand.y(tip) > hand.y(pip) + config.fist_margin
}

/// Strictly monotonic index finger, tip highest.
pub fn index_pointing(hand: &HandLandmarks) -> bool {
    hand.y(Landmark::IndexTip) < hand.y(Landmark::IndexDip)
        && hand.y(Landmark::IndexDip) < hand.y(Landmark::IndexPip)
        && hand.y(Landmark::IndexPip) < hand.y(Landmark::IndexMcp)
}

fn index_raised(hand: &HandLandmarks) -> bool {
    hand.y(Landmark::IndexTip) < hand.y(Landmark::IndexPip)
        && hand.y(Landmark::IndexPip) < hand.y(Landmark::IndexMcp)
}

/// Fist: at least three of four fingers bent and the thumb tip below its
/// IP joint.  A raised index finger excludes a fist outright.
pub fn fist(hand: &HandLandmarks, config: &FeatureConfig) -> bool {
    if index_raised(hand) {
        return false;
    }
    let bent = Landmark::finger_tips_and_pips()
        .iter()
        .filter(|(tip, pip)| finger_bent(hand, *tip, *pip, config))
        .count();
    let thumb_bent = hand.y(Landmark::ThumbTip) > hand.y(Landmark::ThumbIp);
    bent >= 3 && thumb_bent
}

/// Euclidean distance between two canvas points.
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Extract all frame features.
pub fn extract(hand: &HandLandmarks, canvas: CanvasSize, config: &FeatureConfig) -> GestureFeatures {
    let thumb = thumb_extended(hand, config);
    let fingers = Landmark::finger_tips_and_pips()
        .iter()
        .filter(|(tip, pip)| finger_extended(hand, *tip, *pip, config))
        .count() as u8;
    let extended_finger_count = u8::from(thumb) + fingers;

    let thumb_tip = hand.to_canvas(Landmark::ThumbTip, canvas);
    let index_tip = hand.to_canvas(Landmark::IndexTip, canvas);

    GestureFeatures {
        thumb_extended: thumb,
        extended_finger_count,
        is_fist: fist(hand, config),
        is_pinch: distance(thumb_tip, index_tip) < config.pinch_threshold_px,
        is_all_extended: extended_finger_count >= 4,
        is_index_pointing: index_pointing(hand),
        palm_center: hand.to_canvas(Landmark::palm_center(), canvas),
        index_tip,
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
pub(crate) fn test_fist_hand() -> HandLandmarks {
    let mut hand = super::landmarks::test_open_hand();
    // Fingertips curled below their PIP joints.
    for (tip, pip) in Landmark::finger_tips_and_pips() {
        let px = hand.x(pip);
        let py = hand.y(pip);
        hand.set(tip, px, py + 0.06);
    }
    // Index DIP tucked as well so the finger is not monotonic.
    hand.set(Landmark::IndexDip, 0.44, 0.60);
    // Thumb folded across the palm, tip below IP, close to MCP in x.
    hand.set(Landmark::ThumbIp, 0.40, 0.70);
    hand.set(Landmark::ThumbTip, 0.42, 0.74);
    hand
}

#[cfg(test)]
pub(crate) fn test_pointing_hand() -> HandLandmarks {
    let mut hand = test_fist_hand();
    hand.set(Landmark::IndexPip, 0.44, 0.55);
    hand.set(Landmark::IndexDip, 0.44, 0.47);
    hand.set(Landmark::IndexTip, 0.44, 0.40);
    hand
}

#[cfg(test)]
pub(crate) fn test_pinch_hand() -> HandLandmarks {
    let mut hand = test_fist_hand();
    // Index tip and thumb tip touching; index not pointing.
    hand.set(Landmark::ThumbTip, 0.42, 0.60);
    hand.set(Landmark::ThumbIp, 0.40, 0.66);
    hand.set(Landmark::IndexTip, 0.43, 0.60);
    hand.set(Landmark::IndexDip, 0.44, 0.58);
    hand.set(Landmark::MiddleTip, 0.50, 0.50);
    hand
}
