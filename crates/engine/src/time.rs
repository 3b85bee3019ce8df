use serde::{Deserialize, Serialize};

/// A span of playback time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// Creates a range without validating its bounds.
    ///
    /// # Example
    /// ```
    /// use caption_engine::TimeRange;
    ///
    /// let range = TimeRange::new(0.08, 1.28);
    /// assert!((range.duration() - 1.2).abs() < 1e-9);
    /// ```
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns `end - start`, which may be zero or negative for degenerate ranges.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns true for `start <= t < end`.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Returns true for `start <= t <= end`.
    pub fn contains_inclusive(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

}

/// Clamps `value` into `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Normalizes an externally supplied playhead.
///
/// Seeks may move before the first caption or past the end of the document, so
/// finite values are kept as they are. NaN becomes 0 and infinities saturate to the
/// largest finite value of the same sign.
pub fn normalize_playhead(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else if t.is_infinite() {
        if t > 0.0 { f64::MAX } else { f64::MIN }
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeRange, clamp_unit, normalize_playhead};

    #[test]
    fn contains_excludes_end_but_inclusive_keeps_it() {
        let range = TimeRange::new(1.0, 2.0);
        assert!(range.contains(1.0));
        assert!(!range.contains(2.0));
        assert!(range.contains_inclusive(2.0));
    }

    #[test]
    fn clamp_unit_maps_nan_to_zero() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
    }

    #[test]
    fn normalize_playhead_keeps_finite_times_and_rewrites_nan() {
        assert_eq!(normalize_playhead(-3.0), -3.0);
        assert_eq!(normalize_playhead(4.5), 4.5);
        assert_eq!(normalize_playhead(f64::NAN), 0.0);
        assert_eq!(normalize_playhead(f64::INFINITY), f64::MAX);
        assert_eq!(normalize_playhead(f64::NEG_INFINITY), f64::MIN);
    }
}
