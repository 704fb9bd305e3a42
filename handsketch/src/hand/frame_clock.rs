//! Frame interval bookkeeping for the gesture pipeline.
//!
//! Tracks the interval between consecutive frames, flags pauses in frame
//! delivery, and maintains rolling statistics for status reporting.

use tracing::{debug, warn};

/// Result of registering one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Milliseconds since the previous frame, if there was one.
    pub interval_ms: Option<f64>,
    /// Set when the interval exceeded the pause threshold.
    pub gap_ms: Option<f64>,
}

/// Rolling frame interval statistics over a window of samples.
#[derive(Debug)]
pub struct FrameClock {
    /// Recent frame intervals in milliseconds.
    pub intervals: Vec<f64>,
    /// Maximum number of samples to keep.
    pub window_size: usize,
    /// Interval above which frame delivery is considered paused.
    pub max_gap_ms: f64,
    /// Total frames registered.
    pub total_frames: u64,
    /// Total pauses detected.
    pub gaps: u64,
    last_frame_ms: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(300, 500.0)
    }
}

impl FrameClock {
    pub fn new(window_size: usize, max_gap_ms: f64) -> Self {
        Self {
            intervals: Vec::with_capacity(window_size),
            window_size,
            max_gap_ms,
            total_frames: 0,
            gaps: 0,
            last_frame_ms: None,
        }
    }

    /// Register a frame at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> FrameTick {
        self.total_frames += 1;
        let prev = self.last_frame_ms.replace(now_ms);
        let Some(prev) = prev else {
            return FrameTick {
                interval_ms: None,
                gap_ms: None,
            };
        };

        let mut interval = now_ms - prev;
        if interval < 0.0 {
            warn!("Frame timestamp went backwards by {:.1} ms", -interval);
            interval = 0.0;
        }

        if interval > self.max_gap_ms {
            self.gaps += 1;
            debug!("Frame gap of {:.0} ms treated as pause", interval);
            return FrameTick {
                interval_ms: Some(interval),
                gap_ms: Some(interval),
            };
        }

        self.intervals.push(interval);
        if self.intervals.len() > self.window_size {
            self.intervals.remove(0);
        }
        FrameTick {
            interval_ms: Some(interval),
            gap_ms: None,
        }
    }

    /// Compute percentile from a sorted slice.
    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let idx = ((sorted.len() as f64 - 1.0) * p / 100.0).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Interval statistics over the current window.  Pauses are excluded.
    pub fn stats(&self) -> FrameClockStats {
        let mut sorted = self.intervals.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let p50 = Self::percentile(&sorted, 50.0);
        FrameClockStats {
            interval_p50: p50,
            interval_p99: Self::percentile(&sorted, 99.0),
            fps: if p50 > 0.0 { 1000.0 / p50 } else { 0.0 },
            total_frames: self.total_frames,
            gaps: self.gaps,
        }
    }

    /// Format stats as an s-expression.
    pub fn stats_sexp(&self) -> String {
        let s = self.stats();
        format!(
            "(:interval-p50 {:.1} :interval-p99 {:.1} :fps {:.0} :total-frames {} :gaps {})",
            s.interval_p50, s.interval_p99, s.fps, s.total_frames, s.gaps,
        )
    }
}

/// Computed frame interval statistics.
#[derive(Debug, Clone)]
pub struct FrameClockStats {
    pub interval_p50: f64,
    pub interval_p99: f64,
    pub fps: f64,
    pub total_frames: u64,
    pub gaps: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_has_no_interval() {
        let mut clock = FrameClock::default();
        let tick = clock.tick(1000.0);
        assert_eq!(tick.interval_ms, None);
        assert_eq!(tick.gap_ms, None);
        assert_eq!(clock.total_frames, 1);
    }

    #[test]
    fn test_steady_frames() {
        let mut clock = FrameClock::new(100, 500.0);
        for i in 0..31 {
            let tick = clock.tick(i as f64 * 33.0);
            assert!(tick.gap_ms.is_none());
        }
        let stats = clock.stats();
        assert!((stats.interval_p50 - 33.0).abs() < 1e-9);
        assert!((stats.fps - 30.3).abs() < 0.1);
        assert_eq!(stats.gaps, 0);
    }

    #[test]
    fn test_gap_detection() {
        let mut clock = FrameClock::new(100, 500.0);
        clock.tick(0.0);
        clock.tick(33.0);
        let tick = clock.tick(2033.0);
        assert_eq!(tick.gap_ms, Some(2000.0));
        assert_eq!(clock.gaps, 1);
        // Pauses do not pollute the interval window.
        assert_eq!(clock.intervals.len(), 1);
    }

    #[test]
    fn test_backwards_timestamp_clamped() {
        let mut clock = FrameClock::default();
        clock.tick(100.0);
        let tick = clock.tick(50.0);
        assert_eq!(tick.interval_ms, Some(0.0));
        assert_eq!(tick.gap_ms, None);
    }

    #[test]
    fn test_window_size_trim() {
        let mut clock = FrameClock::new(5, 500.0);
        for i in 0..10 {
            clock.tick(i as f64 * 10.0);
        }
        assert_eq!(clock.intervals.len(), 5);
        assert_eq!(clock.total_frames, 10);
    }

    #[test]
    fn test_stats_sexp_format() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        clock.tick(20.0);
        let sexp = clock.stats_sexp();
        assert!(sexp.starts_with("(:interval-p50 20.0"));
        assert!(sexp.contains(":fps 50"));
        assert!(sexp.contains(":gaps 0"));
    }
}
