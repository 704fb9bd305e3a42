//! Configuration loading and reporting.
//!
//! Configuration is a keyword plist, e.g.
//! `(:fist-hold-ms 800 :tolerance 40 :progress-mode arc-length)`.
//! Absent keys keep their defaults.

use std::path::Path;

use lexpr::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::hand::GestureConfig;
use crate::practice::{ProgressMode, TracingConfig};
use crate::sexp::{bool_sexp, get_bool, get_float, get_int, get_keyword, plist_keys};
use crate::tools::{ToolConfig, DEFAULT_PALETTE};

/// Keys understood by [`SketchConfig::apply_sexp`].
pub const CONFIG_KEYS: [&str; 17] = [
    "thumb-threshold",
    "finger-margin",
    "fist-margin",
    "pinch-threshold",
    "smoothing",
    "fist-hold-ms",
    "fist-cooldown-ms",
    "color-cooldown-ms",
    "effect-cooldown-ms",
    "max-frame-gap-ms",
    "tolerance",
    "min-completeness",
    "progress-increment",
    "progress-mode",
    "adaptive-tolerance",
    "match-open-shapes",
    "palette-size",
];

/// Full configuration for a drawing session.
#[derive(Debug, Clone, Default)]
pub struct SketchConfig {
    pub gesture: GestureConfig,
    pub tracing: TracingConfig,
    pub tools: ToolConfig,
}

impl SketchConfig {
    /// Load from a file containing one plist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::default();
        config.apply_str(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from plist text.
    pub fn apply_str(&mut self, text: &str) -> Result<()> {
        let value = lexpr::from_str(text)
            .map_err(|e| Error::Config(format!("malformed s-expression: {e}")))?;
        self.apply_sexp(&value)
    }

    /// Apply overrides from a parsed plist.  Validation happens before
    /// anything is changed, so a rejected plist leaves `self` untouched.
    pub fn apply_sexp(&mut self, value: &Value) -> Result<()> {
        for key in plist_keys(value) {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                warn!("Ignoring unknown config key :{}", key);
            }
        }

        let mut next = self.clone();

        let g = &mut next.gesture;
        set_float(value, "thumb-threshold", &mut g.features.thumb_threshold, 0.0..=1.0)?;
        set_float(value, "finger-margin", &mut g.features.finger_margin, 0.0..=1.0)?;
        set_float(value, "fist-margin", &mut g.features.fist_margin, 0.0..=1.0)?;
        set_float(value, "pinch-threshold", &mut g.features.pinch_threshold_px, 0.0..=f64::MAX)?;
        set_float(value, "smoothing", &mut g.smoothing, f64::MIN_POSITIVE..=1.0)?;
        set_float(value, "fist-hold-ms", &mut g.fist_hold_ms, 0.0..=f64::MAX)?;
        set_float(value, "fist-cooldown-ms", &mut g.fist_cooldown_ms, 0.0..=f64::MAX)?;
        set_float(value, "color-cooldown-ms", &mut g.color_cooldown_ms, 0.0..=f64::MAX)?;
        set_float(value, "effect-cooldown-ms", &mut g.effect_cooldown_ms, 0.0..=f64::MAX)?;
        set_float(value, "max-frame-gap-ms", &mut g.max_frame_gap_ms, f64::MIN_POSITIVE..=f64::MAX)?;

        let t = &mut next.tracing;
        set_float(value, "tolerance", &mut t.tolerance, 0.0..=f64::MAX)?;
        set_float(value, "min-completeness", &mut t.min_completeness, f64::MIN_POSITIVE..=1.0)?;
        set_float(value, "progress-increment", &mut t.progress_increment, f64::MIN_POSITIVE..=1.0)?;
        if let Some(mode) = get_keyword(value, "progress-mode") {
            t.progress_mode = ProgressMode::parse(&mode).ok_or_else(|| {
                Error::Config(format!(":progress-mode must be fixed or arc-length, got {mode}"))
            })?;
        }
        if let Some(b) = get_bool(value, "adaptive-tolerance") {
            t.adaptive_tolerance = b;
        }
        if let Some(b) = get_bool(value, "match-open-shapes") {
            t.match_open_shapes = b;
        }

        if get_keyword(value, "palette-size").is_some() {
            let n = get_int(value, "palette-size")
                .filter(|n| (1..=DEFAULT_PALETTE.len() as i64).contains(n))
                .ok_or_else(|| {
                    Error::Config(format!(
                        ":palette-size must be an integer from 1 to {}",
                        DEFAULT_PALETTE.len()
                    ))
                })?;
            next.tools.palette_size = n as usize;
        }
        next.gesture.palette_size = next.tools.palette_size;

        *self = next;
        Ok(())
    }

    /// Generate s-expression for the effective configuration.
    pub fn config_sexp(&self) -> String {
        let g = &self.gesture;
        let t = &self.tracing;
        format!(
            "(:thumb-threshold {} :finger-margin {} :fist-margin {} :pinch-threshold {} :smoothing {} :fist-hold-ms {} :fist-cooldown-ms {} :color-cooldown-ms {} :effect-cooldown-ms {} :max-frame-gap-ms {} :tolerance {} :min-completeness {} :progress-increment {} :progress-mode {} :adaptive-tolerance {} :match-open-shapes {} :palette-size {})",
            g.features.thumb_threshold,
            g.features.finger_margin,
            g.features.fist_margin,
            g.features.pinch_threshold_px,
            g.smoothing,
            g.fist_hold_ms,
            g.fist_cooldown_ms,
            g.color_cooldown_ms,
            g.effect_cooldown_ms,
            g.max_frame_gap_ms,
            t.tolerance,
            t.min_completeness,
            t.progress_increment,
            t.progress_mode.as_str(),
            bool_sexp(t.adaptive_tolerance),
            bool_sexp(t.match_open_shapes),
            self.tools.palette_size,
        )
    }
}

/// Override `target` from `:key` when present, rejecting values outside `range`.
fn set_float(
    value: &Value,
    key: &str,
    target: &mut f64,
    range: std::ops::RangeInclusive<f64>,
) -> Result<()> {
    if get_keyword(value, key).is_none() {
        return Ok(());
    }
    match get_float(value, key) {
        Some(v) if v.is_finite() && range.contains(&v) => {
            *target = v;
            Ok(())
        }
        _ => Err(Error::Config(format!(
            ":{} must be a number in [{}, {}]",
            key,
            range.start(),
            range.end()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SketchConfig::default();
        assert_eq!(c.gesture.fist_hold_ms, 1000.0);
        assert_eq!(c.gesture.fist_cooldown_ms, 2000.0);
        assert_eq!(c.tracing.tolerance, 50.0);
        assert_eq!(c.tracing.progress_mode, ProgressMode::Fixed);
        assert_eq!(c.tools.palette_size, 8);
    }

    #[test]
    fn test_apply_overrides() {
        let mut c = SketchConfig::default();
        c.apply_str(
            "(:fist-hold-ms 800 :tolerance 40 :progress-mode arc-length :match-open-shapes t :palette-size 4 :smoothing 0.5)",
        )
        .expect("valid config");
        assert_eq!(c.gesture.fist_hold_ms, 800.0);
        assert_eq!(c.tracing.tolerance, 40.0);
        assert_eq!(c.tracing.progress_mode, ProgressMode::ArcLength);
        assert!(c.tracing.match_open_shapes);
        assert!(!c.tracing.adaptive_tolerance);
        assert_eq!(c.tools.palette_size, 4);
        assert_eq!(c.gesture.palette_size, 4);
        assert_eq!(c.gesture.smoothing, 0.5);
        // Untouched keys keep defaults.
        assert_eq!(c.gesture.color_cooldown_ms, 2000.0);
    }

    #[test]
    fn test_invalid_value_leaves_config_untouched() {
        let mut c = SketchConfig::default();
        let err = c.apply_str("(:tolerance 10 :min-completeness 2.0)").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(c.tracing.tolerance, 50.0);
    }

    #[test]
    fn test_invalid_mode_and_palette() {
        let mut c = SketchConfig::default();
        assert!(c.apply_str("(:progress-mode spiral)").is_err());
        assert!(c.apply_str("(:palette-size 9)").is_err());
        assert!(c.apply_str("(:palette-size 0)").is_err());
        assert!(c.apply_str("(:fist-hold-ms soon)").is_err());
    }

    #[test]
    fn test_malformed_text() {
        let mut c = SketchConfig::default();
        assert!(matches!(c.apply_str("(:tolerance"), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut c = SketchConfig::default();
        c.apply_str("(:sparkles t :tolerance 30)").expect("unknown keys are warnings");
        assert_eq!(c.tracing.tolerance, 30.0);
    }

    #[test]
    fn test_config_sexp_round_trip() {
        let mut c = SketchConfig::default();
        c.apply_str("(:tolerance 42 :adaptive-tolerance t)").expect("valid");
        let sexp = c.config_sexp();
        assert!(sexp.contains(":tolerance 42"));
        assert!(sexp.contains(":adaptive-tolerance t"));
        let mut reloaded = SketchConfig::default();
        reloaded.apply_str(&sexp).expect("own output parses");
        assert_eq!(reloaded.tracing.tolerance, 42.0);
        assert!(reloaded.tracing.adaptive_tolerance);
        assert_eq!(reloaded.gesture.fist_hold_ms, 1000.0);
    }

    #[test]
    fn test_from_file_missing() {
        let err = SketchConfig::from_file(Path::new("/nonexistent/handsketch.sexp")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
