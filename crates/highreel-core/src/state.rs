// crates/highreel-core/src/state.rs
// Pure playback data. No runtime handles, no listeners.
// The tracker in highreel-media owns one of these per attach and feeds it
// source events; everything that decides *what changed* lives here so it can
// be tested without a source.
use serde::{Deserialize, Serialize};

use crate::media_types::SegmentChange;
use crate::timeline::Segment;
use crate::helpers::geometry::progress_pct;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    current_time:   f64,
    /// 0 while unknown: before the first report, and after a non-finite one.
    duration:       f64,
    /// Derived from `current_time` on every position update; never set directly.
    active_segment: Option<usize>,
}

impl PlaybackState {
    /// Initial state for a fresh attach. Non-finite inputs are treated as 0.
    pub fn new(current_time: f64, duration: f64) -> Self {
        Self {
            current_time:   if current_time.is_finite() { current_time } else { 0.0 },
            duration:       if duration.is_finite() { duration } else { 0.0 },
            active_segment: None,
        }
    }

    /// Initial state with the active segment already resolved against
    /// `segments`, for sources that are mid-playback when attached.
    pub fn seeded(segments: &[Segment], current_time: f64, duration: f64) -> Self {
        let mut state = Self::new(current_time, duration);
        state.active_segment = crate::timeline::find_active_segment(segments, state.current_time);
        state
    }

    pub fn current_time(&self) -> f64 { self.current_time }

    pub fn duration(&self) -> f64 { self.duration }

    pub fn active_segment(&self) -> Option<usize> { self.active_segment }

    /// Signed form of [`active_segment`](Self::active_segment): `-1` when
    /// nothing is active.
    pub fn active_segment_index(&self) -> i64 {
        self.active_segment.map_or(-1, |i| i as i64)
    }

    pub fn duration_known(&self) -> bool {
        self.duration > 0.0
    }

    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.current_time, self.duration)
    }

    /// Record a position update and re-resolve the active segment from
    /// scratch (seeks may jump anywhere). Returns a change only when the
    /// active segment differs from the previous one.
    pub fn apply_position(&mut self, segments: &[Segment], time: f64) -> Option<SegmentChange> {
        self.current_time = time;
        let current = crate::timeline::find_active_segment(segments, time);
        if current == self.active_segment {
            return None;
        }
        let previous = std::mem::replace(&mut self.active_segment, current);
        Some(SegmentChange { previous, current, time })
    }

    /// Record a duration report. A non-finite value (a live stream reports
    /// `INFINITY`) makes the duration unknown again. Returns whether the
    /// stored value changed.
    pub fn apply_duration(&mut self, duration: f64) -> bool {
        let duration = if duration.is_finite() { duration } else { 0.0 };
        if duration == self.duration {
            return false;
        }
        self.duration = duration;
        true
    }
}
