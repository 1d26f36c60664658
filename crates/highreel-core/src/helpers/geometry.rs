// crates/highreel-core/src/helpers/geometry.rs
//
// Timeline → highlight-bar geometry.
//
// Positions are percentages of the bar so any rendering surface can place
// markers without knowing its own pixel width up front. Helpers for the
// inverse direction (a click on the bar → a seek target) live here too so
// both directions share one definition of "percent of duration".

use serde::{Deserialize, Serialize};

use crate::timeline::Segment;

/// Where one highlight marker sits on the bar, in percent of total duration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentGeometry {
    pub left_pct:  f64,
    pub width_pct: f64,
}

impl SegmentGeometry {
    /// `(x, width)` in pixels for a bar `bar_width` pixels wide.
    pub fn to_pixels(&self, bar_width: f64) -> (f64, f64) {
        (bar_width * self.left_pct / 100.0, bar_width * self.width_pct / 100.0)
    }
}

fn duration_known(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Project segments onto the bar.
///
/// Returns nothing until the duration is known. Segments running past the
/// end are not clamped: an overflowing marker points at bad upstream data.
///
/// ```
/// use highreel_core::helpers::geometry::{project, SegmentGeometry};
/// use highreel_core::timeline::Segment;
/// let segs = [Segment::new(0.0, 50.0)];
/// assert!(project(&segs, 0.0).is_empty());
/// assert_eq!(project(&segs, 100.0), vec![SegmentGeometry { left_pct: 0.0, width_pct: 50.0 }]);
/// ```
pub fn project(segments: &[Segment], duration: f64) -> Vec<SegmentGeometry> {
    if !duration_known(duration) {
        return Vec::new();
    }
    segments
        .iter()
        .map(|s| SegmentGeometry {
            left_pct:  100.0 * s.start / duration,
            width_pct: 100.0 * (s.end - s.start) / duration,
        })
        .collect()
}

/// Playhead position in percent, clamped to `[0, 100]`. `0` while the
/// duration is zero or NaN.
pub fn progress_pct(current_time: f64, duration: f64) -> f64 {
    if duration == 0.0 || duration.is_nan() {
        return 0.0;
    }
    let pct = 100.0 * current_time / duration;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Seek target for a fractional bar position (`0.0` = start, `1.0` = end),
/// clamped to `[0, duration]`. `None` while the duration is unknown.
pub fn seek_time_for_ratio(ratio: f64, duration: f64) -> Option<f64> {
    if !duration_known(duration) || ratio.is_nan() {
        return None;
    }
    Some((ratio * duration).clamp(0.0, duration))
}

/// Seek target for a click at horizontal pixel `x` on a bar whose left edge
/// is at `bar_left` and which is `bar_width` pixels wide.
pub fn seek_time_for_click(x: f64, bar_left: f64, bar_width: f64, duration: f64) -> Option<f64> {
    if bar_width.is_nan() || bar_width <= 0.0 {
        return None;
    }
    seek_time_for_ratio((x - bar_left) / bar_width, duration)
}
