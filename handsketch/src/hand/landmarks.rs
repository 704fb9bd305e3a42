//! Hand landmark model for a single camera-tracked hand.
//!
//! Models the 21-point hand skeleton produced by the landmark detector,
//! in normalized [0,1] image coordinates with y growing downward.
//! Provides validated landmark sets and canvas mirroring.

use tracing::debug;

use crate::error::{Error, Result};

// ── Landmark definitions ───────────────────────────────────

/// The 21 anatomical hand landmarks, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl Landmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Landmark used as the palm center.
    pub fn palm_center() -> Landmark {
        Self::MiddleMcp
    }

    /// Non-thumb fingertips paired with their PIP joints.
    pub fn finger_tips_and_pips() -> [(Landmark, Landmark); 4] {
        [
            (Self::IndexTip, Self::IndexPip),
            (Self::MiddleTip, Self::MiddlePip),
            (Self::RingTip, Self::RingPip),
            (Self::PinkyTip, Self::PinkyPip),
        ]
    }
}

// ── Coordinates ────────────────────────────────────────────

/// A normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Map a normalized landmark to canvas pixels, mirrored horizontally
    /// to match a selfie-view camera.
    pub fn mirror(&self, p: NormPoint) -> (f64, f64) {
        (self.width - p.x * self.width, p.y * self.height)
    }
}

// ── Hand landmark set ──────────────────────────────────────

/// Exactly 21 landmarks for one detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [NormPoint; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Build from detector output. Fails unless exactly 21 points are given.
    pub fn from_slice(points: &[NormPoint]) -> Result<Self> {
        let points: [NormPoint; LANDMARK_COUNT] =
            points.try_into().map_err(|_| Error::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            })?;
        Ok(Self { points })
    }

    /// Build from raw (x, y) pairs, returning `None` for anything that is
    /// not a full hand. Callers treat `None` as "no hand this frame".
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Option<Self> {
        let points: Vec<NormPoint> = pairs.iter().map(|&(x, y)| NormPoint::new(x, y)).collect();
        match Self::from_slice(&points) {
            Ok(hand) => Some(hand),
            Err(e) => {
                debug!("Dropping landmark set: {}", e);
                None
            }
        }
    }

    /// Position of a landmark.
    pub fn get(&self, landmark: Landmark) -> NormPoint {
        self.points[landmark.index()]
    }

    /// Vertical coordinate of a landmark (smaller is higher on screen).
    pub fn y(&self, landmark: Landmark) -> f64 {
        self.points[landmark.index()].y
    }

    /// Horizontal coordinate of a landmark.
    pub fn x(&self, landmark: Landmark) -> f64 {
        self.points[landmark.index()].x
    }

    /// Landmark mirrored into canvas pixels.
    pub fn to_canvas(&self, landmark: Landmark, canvas: CanvasSize) -> (f64, f64) {
        canvas.mirror(self.get(landmark))
    }

    /// All points in detector order.
    pub fn points(&self) -> &[NormPoint; LANDMARK_COUNT] {
        &self.points
    }

    /// Mutable access for building synthetic poses.
    #[cfg(test)]
    pub(crate) fn set(&mut self, landmark: Landmark, x: f64, y: f64) {
        self.points[landmark.index()] = NormPoint::new(x, y);
    }
}

/// A neutral open hand, fingers pointing up, used as a pose template in tests.
#[cfg(test)]
pub(crate) fn test_open_hand() -> HandLandmarks {
    let mut hand = HandLandmarks {
        points: [NormPoint::default(); LANDMARK_COUNT],
    };
    hand.set(Landmark::Wrist, 0.5, 0.9);
    hand.set(Landmark::ThumbCmc, 0.42, 0.85);
    hand.set(Landmark::ThumbMcp, 0.38, 0.78);
    hand.set(Landmark::ThumbIp, 0.33, 0.72);
    hand.set(Landmark::ThumbTip, 0.28, 0.66);
    for (i, x) in [0.44, 0.5, 0.56, 0.62].iter().enumerate() {
        let base = 5 + i * 4;
        hand.points[base] = NormPoint::new(*x, 0.65);
        hand.points[base + 1] = NormPoint::new(*x, 0.55);
        hand.points[base + 2] = NormPoint::new(*x, 0.47);
        hand.points[base + 3] = NormPoint::new(*x, 0.40);
    }
    hand
}

// ── Tests ──────────────────────────────────────────────────
