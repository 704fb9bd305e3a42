//! Gesture state machine over per-frame classifications.
//!
//! Turns the frame-by-frame gesture label into debounced events: a held
//! fist toggles the eraser, an open palm advances the color and spawns an
//! effect behind independent cooldowns, a pinch cancels the stroke, and a
//! raised index finger draws.  All timers are driven by caller-supplied
//! monotonic timestamps in milliseconds.

use tracing::{debug, info, warn};

use super::classifier::{classify, GestureLabel};
use super::features::{extract, FeatureConfig, GestureFeatures};
use super::frame_clock::FrameClock;
use super::landmarks::{CanvasSize, HandLandmarks};
use crate::event::Event;

// ── Config ─────────────────────────────────────────────────

/// Configuration for gesture timing and feature thresholds.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Enable gesture processing.
    pub enabled: bool,
    /// Feature extraction thresholds.
    pub features: FeatureConfig,
    /// Palm cursor smoothing factor (weight of the newest sample).
    pub smoothing: f64,
    /// Continuous fist duration (ms) before the eraser toggles.
    pub fist_hold_ms: f64,
    /// Minimum time (ms) between eraser toggles.
    pub fist_cooldown_ms: f64,
    /// Minimum time (ms) between color advances.
    pub color_cooldown_ms: f64,
    /// Minimum time (ms) between effect spawns.
    pub effect_cooldown_ms: f64,
    /// Frame interval (ms) above which delivery is treated as paused.
    pub max_frame_gap_ms: f64,
    /// Number of palette entries the color index cycles through.
    pub palette_size: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            features: FeatureConfig::default(),
            smoothing: 0.3,
            fist_hold_ms: 1000.0,
            fist_cooldown_ms: 2000.0,
            color_cooldown_ms: 2000.0,
            effect_cooldown_ms: 1000.0,
            max_frame_gap_ms: 500.0,
            palette_size: 8,
        }
    }
}

// ── State ──────────────────────────────────────────────────

/// Gesture state for one tracked hand, owned by the frame controller.
pub struct GestureMachine {
    /// Configuration.
    pub config: GestureConfig,
    /// Frame interval tracking and pause detection.
    clock: FrameClock,
    /// When the current fist hold began, if holding.
    fist_hold_start_ms: Option<f64>,
    /// Last eraser toggle.
    last_toggle_ms: Option<f64>,
    /// Last color advance.
    last_color_ms: Option<f64>,
    /// Last effect spawn.
    last_effect_ms: Option<f64>,
    /// Current palette index.
    color_index: usize,
    /// Last stroke point while drawing.
    stroke_last: Option<(f64, f64)>,
    /// Exponentially smoothed palm cursor.
    smoothed_palm: Option<(f64, f64)>,
    /// Most recent classification, `None` when no hand.
    last_label: Option<GestureLabel>,
}

impl GestureMachine {
    /// Create a new gesture machine with defaults.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        let clock = FrameClock::new(300, config.max_frame_gap_ms);
        Self {
            config,
            clock,
            fist_hold_start_ms: None,
            last_toggle_ms: None,
            last_color_ms: None,
            last_effect_ms: None,
            color_index: 0,
            stroke_last: None,
            smoothed_palm: None,
            last_label: None,
        }
    }

    /// Process one frame and return its events.
    ///
    /// `hand` is `None` when no hand was detected.  A pause in frame
    /// delivery longer than `max_frame_gap_ms` interrupts any held gesture
    /// and freezes cooldown timers for the length of the pause.
    pub fn process_frame(
        &mut self,
        hand: Option<&HandLandmarks>,
        canvas: CanvasSize,
        now_ms: f64,
    ) -> Vec<Event> {
        if !self.config.enabled {
            return Vec::new();
        }
        if !now_ms.is_finite() {
            warn!("Dropping frame with non-finite timestamp {}", now_ms);
            return Vec::new();
        }

        let mut events = Vec::new();

        self.clock.max_gap_ms = self.config.max_frame_gap_ms;
        if let Some(gap_ms) = self.clock.tick(now_ms).gap_ms {
            self.interrupt(&mut events);
            self.freeze_cooldowns(gap_ms);
        }

        let Some(hand) = hand else {
            self.interrupt(&mut events);
            self.last_label = None;
            return events;
        };

        let features = extract(hand, canvas, &self.config.features);
        self.smooth_palm(features.palm_center);
        let label = classify(&features);
        if self.last_label != Some(label) {
            debug!("Gesture: {}", label.as_str());
        }
        self.last_label = Some(label);

        if label != GestureLabel::Fist {
            self.fist_hold_start_ms = None;
        }

        match label {
            GestureLabel::Fist => {
                self.end_stroke(&mut events);
                self.update_fist(now_ms, &mut events);
            }
            GestureLabel::AllExtended => {
                self.end_stroke(&mut events);
                self.update_open_palm(&features, now_ms, &mut events);
            }
            GestureLabel::Pinch => {
                // Cancel is transient: emitted on every pinch frame.
                self.stroke_last = None;
                events.push(Event::EndStroke);
            }
            GestureLabel::IndexPointing => {
                self.update_stroke(features.index_tip, &mut events);
            }
            GestureLabel::Idle => {
                self.end_stroke(&mut events);
            }
        }

        events
    }

    /// Fist hold and eraser toggle.
    fn update_fist(&mut self, now_ms: f64, events: &mut Vec<Event>) {
        let Some(start) = self.fist_hold_start_ms else {
            self.fist_hold_start_ms = Some(now_ms);
            return;
        };

        if now_ms - start < self.config.fist_hold_ms {
            return;
        }
        let cooled = self
            .last_toggle_ms
            .map_or(true, |t| now_ms - t >= self.config.fist_cooldown_ms);
        if cooled {
            self.last_toggle_ms = Some(now_ms);
            info!("Fist held {:.0} ms: toggling eraser", now_ms - start);
            events.push(Event::ToggleEraser);
        }
    }

    /// Color and effect gates, independent of each other.
    fn update_open_palm(&mut self, features: &GestureFeatures, now_ms: f64, events: &mut Vec<Event>) {
        let effect_ready = self
            .last_effect_ms
            .map_or(true, |t| now_ms - t > self.config.effect_cooldown_ms);
        if effect_ready {
            self.last_effect_ms = Some(now_ms);
            let (x, y) = features.palm_center;
            events.push(Event::SpawnEffect { x, y });
        }

        let color_ready = self
            .last_color_ms
            .map_or(true, |t| now_ms - t > self.config.color_cooldown_ms);
        if color_ready {
            self.last_color_ms = Some(now_ms);
            self.color_index = (self.color_index + 1) % self.config.palette_size.max(1);
            debug!("Color advanced to {}", self.color_index);
            events.push(Event::AdvanceColor {
                index: self.color_index,
            });
        }
    }

    /// Begin or extend the index-finger stroke.
    fn update_stroke(&mut self, pos: (f64, f64), events: &mut Vec<Event>) {
        match self.stroke_last.replace(pos) {
            None => events.push(Event::BeginStroke { x: pos.0, y: pos.1 }),
            Some(from) => events.push(Event::ExtendStroke { from, to: pos }),
        }
    }

    /// End the active stroke, if any.
    fn end_stroke(&mut self, events: &mut Vec<Event>) {
        if self.stroke_last.take().is_some() {
            events.push(Event::EndStroke);
        }
    }

    /// Gesture interrupted: stroke ends, hold resets, cursor forgets.
    /// Cooldown timestamps are left alone.
    fn interrupt(&mut self, events: &mut Vec<Event>) {
        self.end_stroke(events);
        self.fist_hold_start_ms = None;
        self.smoothed_palm = None;
    }

    /// Shift cooldown timestamps so a pause does not count as elapsed time.
    fn freeze_cooldowns(&mut self, gap_ms: f64) {
        for stamp in [
            &mut self.last_toggle_ms,
            &mut self.last_color_ms,
            &mut self.last_effect_ms,
        ] {
            if let Some(t) = stamp {
                *t += gap_ms;
            }
        }
    }

    fn smooth_palm(&mut self, current: (f64, f64)) {
        let alpha = self.config.smoothing;
        let next = match self.smoothed_palm {
            Some(old) => (
                old.0 * (1.0 - alpha) + current.0 * alpha,
                old.1 * (1.0 - alpha) + current.1 * alpha,
            ),
            None => current,
        };
        self.smoothed_palm = Some(next);
    }

    /// Jitter-reduced palm cursor, `None` while no hand is tracked.
    pub fn smoothed_palm(&self) -> Option<(f64, f64)> {
        self.smoothed_palm
    }

    /// Current palette index.
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Set the palette index directly (e.g. from a UI click).
    pub fn set_color_index(&mut self, index: usize) {
        self.color_index = index % self.config.palette_size.max(1);
    }

    /// Whether a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.stroke_last.is_some()
    }

    /// Whether a fist hold is being timed.
    pub fn is_holding_fist(&self) -> bool {
        self.fist_hold_start_ms.is_some()
    }

    /// Most recent classification, `None` when no hand was seen.
    pub fn last_label(&self) -> Option<GestureLabel> {
        self.last_label
    }

    /// Frame interval statistics.
    pub fn frame_clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Reset all gesture state, cooldowns included.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// Generate s-expression for status.
    pub fn status_sexp(&self, now_ms: f64) -> String {
        let gesture = self
            .last_label
            .map(|g| g.as_str().to_string())
            .unwrap_or_else(|| "nil".to_string());
        let hold_ms = self.fist_hold_start_ms.map_or(0.0, |s| (now_ms - s).max(0.0));
        let palm = self
            .smoothed_palm
            .map(|(x, y)| format!("(:x {:.1} :y {:.1})", x, y))
            .unwrap_or_else(|| "nil".to_string());
        format!(
            "(:enabled {} :gesture {} :hold-ms {:.0} :drawing {} :color-index {} :palm {} :frames {})",
            if self.config.enabled { "t" } else { "nil" },
            gesture,
            hold_ms,
            if self.is_drawing() { "t" } else { "nil" },
            self.color_index,
            palm,
            self.clock.stats_sexp(),
        )
    }

    /// Generate s-expression for config.
    pub fn config_sexp(&self) -> String {
        let c = &self.config;
        format!(
            "(:enabled {} :thumb-threshold {:.3} :finger-margin {:.3} :fist-margin {:.3} :pinch-threshold {:.1} :smoothing {:.2} :fist-hold-ms {:.0} :fist-cooldown-ms {:.0} :color-cooldown-ms {:.0} :effect-cooldown-ms {:.0} :max-frame-gap-ms {:.0} :palette-size {})",
            if c.enabled { "t" } else { "nil" },
            c.features.thumb_threshold,
            c.features.finger_margin,
            c.features.fist_margin,
            c.features.pinch_threshold_px,
            c.smoothing,
            c.fist_hold_ms,
            c.fist_cooldown_ms,
            c.color_cooldown_ms,
            c.effect_cooldown_ms,
            c.max_frame_gap_ms,
            c.palette_size,
        )
    }
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::features::{test_fist_hand, test_pinch_hand, test_pointing_hand};
    use crate::hand::landmarks::{test_open_hand, Landmark};

    const FRAME_MS: f64 = 1000.0 / 30.0;

    fn canvas() -> CanvasSize {
        CanvasSize::new(1000.0, 1000.0)
    }

    fn frame_time(i: usize) -> f64 {
        i as f64 * 1000.0 / 30.0
    }

    fn count(events: &[Event], pred: impl Fn(&Event) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_new_state() {
        let machine = GestureMachine::new();
        assert!(machine.config.enabled);
        assert_eq!(machine.color_index(), 0);
        assert!(!machine.is_drawing());
        assert!(machine.last_label().is_none());
        assert!(machine.smoothed_palm().is_none());
    }

    #[test]
    fn test_fist_toggle_once_per_cooldown() {
        let mut machine = GestureMachine::new();
        let fist = test_fist_hand();
        let mut toggles = Vec::new();

        // 5 seconds of continuous fist at 30 Hz.
        for i in 0..=150 {
            let t = frame_time(i);
            let events = machine.process_frame(Some(&fist), canvas(), t);
            if events.contains(&Event::ToggleEraser) {
                toggles.push(t);
            }
        }

        assert!(!toggles.is_empty());
        let first = toggles[0];
        assert!(first >= 1000.0 && first < 1000.0 + FRAME_MS, "first toggle at {}", first);
        for pair in toggles.windows(2) {
            assert!(pair[1] - pair[0] >= 2000.0, "toggles too close: {:?}", toggles);
        }
        // 1000, 3000, 5000 ms.
        assert_eq!(toggles.len(), 3);
    }

    #[test]
    fn test_fist_hold_interrupted_restarts() {
        let mut machine = GestureMachine::new();
        let fist = test_fist_hand();
        let idle = test_pointing_hand();

        // Hold for ~500 ms, then one non-fist frame.
        for i in 0..=15 {
            let events = machine.process_frame(Some(&fist), canvas(), frame_time(i));
            assert!(!events.contains(&Event::ToggleEraser));
        }
        machine.process_frame(Some(&idle), canvas(), frame_time(16));
        assert!(!machine.is_holding_fist());

        // Re-enter fist at frame 17: needs a full second again.
        let restart = frame_time(17);
        let mut fired_at = None;
        for i in 17..=60 {
            let t = frame_time(i);
            if machine
                .process_frame(Some(&fist), canvas(), t)
                .contains(&Event::ToggleEraser)
            {
                fired_at = Some(t);
                break;
            }
        }
        let fired_at = fired_at.expect("toggle after full hold");
        assert!(fired_at - restart >= 1000.0, "fired after {} ms", fired_at - restart);
    }

    #[test]
    fn test_no_hand_resets_hold_but_not_cooldown() {
        let mut machine = GestureMachine::new();
        let fist = test_fist_hand();

        for i in 0..=30 {
            machine.process_frame(Some(&fist), canvas(), frame_time(i));
        }
        assert_eq!(machine.last_toggle_ms, Some(1000.0));

        let events = machine.process_frame(None, canvas(), frame_time(31));
        assert!(events.is_empty());
        assert!(!machine.is_holding_fist());
        assert_eq!(machine.last_toggle_ms, Some(1000.0));
        assert!(machine.smoothed_palm().is_none());
    }

    #[test]
    fn test_open_palm_fires_both_gates() {
        let mut machine = GestureMachine::new();
        let palm = test_open_hand();
        let events = machine.process_frame(Some(&palm), canvas(), 0.0);
        assert_eq!(count(&events, |e| matches!(e, Event::SpawnEffect { .. })), 1);
        assert!(events.contains(&Event::AdvanceColor { index: 1 }));
        assert_eq!(machine.color_index(), 1);
    }

    #[test]
    fn test_open_palm_gates_independent() {
        let mut machine = GestureMachine::new();
        let palm = test_open_hand();
        let mut effects = 0;
        let mut colors = 0;

        // Held open palm for 1.5 s: effect cooldown (1000) elapses, color (2000) does not.
        for i in 0..=45 {
            let events = machine.process_frame(Some(&palm), canvas(), frame_time(i));
            effects += count(&events, |e| matches!(e, Event::SpawnEffect { .. }));
            colors += count(&events, |e| matches!(e, Event::AdvanceColor { .. }));
        }
        assert_eq!(effects, 2);
        assert_eq!(colors, 1);
    }

    #[test]
    fn test_effect_without_color_same_frame() {
        let mut machine = GestureMachine::new();
        let palm = test_open_hand();
        machine.last_effect_ms = Some(0.0);
        machine.last_color_ms = Some(0.0);
        machine.clock.tick(1100.0 - FRAME_MS);

        let events = machine.process_frame(Some(&palm), canvas(), 1100.0);
        assert!(events.iter().any(|e| matches!(e, Event::SpawnEffect { .. })));
        assert!(!events.iter().any(|e| matches!(e, Event::AdvanceColor { .. })));
    }

    #[test]
    fn test_color_wraps() {
        let mut machine = GestureMachine::new();
        machine.config.palette_size = 3;
        let palm = test_open_hand();
        let mut indices = Vec::new();
        for i in 0..4 {
            machine.last_color_ms = None;
            for e in machine.process_frame(Some(&palm), canvas(), i as f64 * FRAME_MS) {
                if let Event::AdvanceColor { index } = e {
                    indices.push(index);
                }
            }
        }
        assert_eq!(indices, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut machine = GestureMachine::new();
        let mut pointing = test_pointing_hand();

        let events = machine.process_frame(Some(&pointing), canvas(), 0.0);
        assert_eq!(events, vec![Event::BeginStroke { x: 560.0, y: 400.0 }]);
        assert!(machine.is_drawing());

        pointing.set(Landmark::IndexTip, 0.40, 0.38);
        let events = machine.process_frame(Some(&pointing), canvas(), FRAME_MS);
        assert_eq!(
            events,
            vec![Event::ExtendStroke {
                from: (560.0, 400.0),
                to: (600.0, 380.0)
            }]
        );

        let events = machine.process_frame(Some(&test_fist_hand()), canvas(), 2.0 * FRAME_MS);
        assert_eq!(events, vec![Event::EndStroke]);
        assert!(!machine.is_drawing());

        // No duplicate end when nothing is active.
        let events = machine.process_frame(Some(&test_fist_hand()), canvas(), 3.0 * FRAME_MS);
        assert!(!events.contains(&Event::EndStroke));
    }

    #[test]
    fn test_pinch_cancels_every_frame() {
        let mut machine = GestureMachine::new();
        machine.process_frame(Some(&test_pointing_hand()), canvas(), 0.0);
        let pinch = test_pinch_hand();
        for i in 1..4 {
            let events = machine.process_frame(Some(&pinch), canvas(), i as f64 * FRAME_MS);
            assert_eq!(events, vec![Event::EndStroke]);
        }
        assert!(!machine.is_drawing());
        // Pointing again starts a new stroke rather than extending.
        let events = machine.process_frame(Some(&test_pointing_hand()), canvas(), 4.0 * FRAME_MS);
        assert!(matches!(events[0], Event::BeginStroke { .. }));
    }

    #[test]
    fn test_hand_lost_ends_stroke() {
        let mut machine = GestureMachine::new();
        machine.process_frame(Some(&test_pointing_hand()), canvas(), 0.0);
        let events = machine.process_frame(None, canvas(), FRAME_MS);
        assert_eq!(events, vec![Event::EndStroke]);
        assert!(machine.last_label().is_none());
    }

    #[test]
    fn test_non_finite_timestamp_dropped() {
        let mut machine = GestureMachine::new();
        let fist = test_fist_hand();
        machine.process_frame(Some(&fist), canvas(), 0.0);
        for bad in [f64::NAN, f64::INFINITY] {
            assert!(machine.process_frame(Some(&fist), canvas(), bad).is_empty());
        }
        assert_eq!(machine.fist_hold_start_ms, Some(0.0));
        assert_eq!(machine.last_toggle_ms, None);

        let mut toggles = Vec::new();
        for i in 1..=150 {
            let t = frame_time(i);
            if machine.process_frame(Some(&fist), canvas(), t).contains(&Event::ToggleEraser) {
                toggles.push(t);
            }
        }
        assert_eq!(toggles, vec![1000.0, 3000.0, 5000.0]);
    }

    #[test]
    fn test_pause_does_not_complete_hold() {
        let mut machine = GestureMachine::new();
        let fist = test_fist_hand();
        machine.process_frame(Some(&fist), canvas(), 0.0);
        machine.process_frame(Some(&fist), canvas(), FRAME_MS);
        // Two second gap, then fist again: the gap is not hold time.
        let events = machine.process_frame(Some(&fist), canvas(), 2000.0);
        assert!(!events.contains(&Event::ToggleEraser));
        assert!(machine.is_holding_fist());
        assert_eq!(machine.fist_hold_start_ms, Some(2000.0));
    }

    #[test]
    fn test_pause_freezes_cooldowns() {
        let mut machine = GestureMachine::new();
        let palm = test_open_hand();
        machine.process_frame(Some(&palm), canvas(), 0.0);
        assert_eq!(machine.last_color_ms, Some(0.0));

        // A 5 s pause: without freezing, both cooldowns would have elapsed.
        machine.process_frame(None, canvas(), 100.0);
        let events = machine.process_frame(Some(&palm), canvas(), 5100.0);
        assert!(!events.iter().any(|e| matches!(e, Event::AdvanceColor { .. })));
        assert!(!events.iter().any(|e| matches!(e, Event::SpawnEffect { .. })));
        assert_eq!(machine.last_color_ms, Some(5000.0));
    }

    #[test]
    fn test_palm_smoothing() {
        let mut machine = GestureMachine::new();
        let mut palm = test_open_hand();
        machine.process_frame(Some(&palm), canvas(), 0.0);
        assert_eq!(machine.smoothed_palm(), Some((500.0, 650.0)));

        // Move palm 100 px left on the canvas (mirrored: +0.1 in x).
        palm.set(Landmark::MiddleMcp, 0.6, 0.65);
        machine.process_frame(Some(&palm), canvas(), FRAME_MS);
        let (x, y) = machine.smoothed_palm().expect("palm");
        assert!((x - 470.0).abs() < 1e-9, "x = {}", x);
        assert!((y - 650.0).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_no_events() {
        let mut machine = GestureMachine::new();
        machine.config.enabled = false;
        let events = machine.process_frame(Some(&test_open_hand()), canvas(), 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut machine = GestureMachine::new();
        machine.process_frame(Some(&test_open_hand()), canvas(), 0.0);
        machine.process_frame(Some(&test_pointing_hand()), canvas(), FRAME_MS);
        machine.reset();
        assert_eq!(machine.color_index(), 0);
        assert!(!machine.is_drawing());
        assert!(machine.last_color_ms.is_none());
    }

    #[test]
    fn test_status_sexp() {
        let machine = GestureMachine::new();
        let sexp = machine.status_sexp(0.0);
        assert!(sexp.contains(":enabled t"));
        assert!(sexp.contains(":gesture nil"));
        assert!(sexp.contains(":drawing nil"));
        assert!(sexp.contains(":palm nil"));
        assert!(lexpr::from_str(&sexp).is_ok());
    }

    #[test]
    fn test_config_sexp() {
        let machine = GestureMachine::new();
        let sexp = machine.config_sexp();
        assert!(sexp.contains(":thumb-threshold 0.060"));
        assert!(sexp.contains(":pinch-threshold 50.0"));
        assert!(sexp.contains(":fist-hold-ms 1000"));
        assert!(sexp.contains(":color-cooldown-ms 2000"));
        assert!(sexp.contains(":palette-size 8"));
    }
}
