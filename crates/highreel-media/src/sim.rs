// crates/highreel-media/src/sim.rs
//
// SimulatedSource: a MediaSource with no decoder behind it, just a clock.
//
// Used as the fake player in tests and as the playback engine behind
// `highreel play`. The clock only moves when the owner calls `advance(dt)`
// (one UI frame / tick), exactly like the playhead in an egui-style update
// loop: `if playing { position += dt }`, stopping at the end.
//
// Event timing mirrors a platform media element:
//   - `set_current_time` does not emit; the next `advance` reports the new
//     position even while paused (the "timeupdate after seek").
//   - `set_duration` emits a duration change with whatever value it is given.

use parking_lot::Mutex;

use highreel_core::media_types::MediaError;

use crate::listeners::{Listeners, Subscription};
use crate::source::{DurationCallback, ErrorCallback, MediaSource, PositionCallback};

struct Clock {
    position:     f64,
    /// NaN until known.
    duration:     f64,
    playing:      bool,
    seek_pending: bool,
}

impl Clock {
    fn duration_known(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    fn clamp(&self, t: f64) -> f64 {
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
        if self.duration_known() { t.min(self.duration) } else { t }
    }
}

pub struct SimulatedSource {
    clock:     Mutex<Clock>,
    positions: Listeners<f64>,
    durations: Listeners<f64>,
    errors:    Listeners<MediaError>,
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSource {
    /// A paused source at 0 s whose duration is not yet known.
    pub fn new() -> Self {
        Self {
            clock: Mutex::new(Clock {
                position:     0.0,
                duration:     f64::NAN,
                playing:      false,
                seek_pending: false,
            }),
            positions: Listeners::new(),
            durations: Listeners::new(),
            errors:    Listeners::new(),
        }
    }

    /// A source whose metadata is already loaded.
    pub fn with_duration(duration: f64) -> Self {
        let source = Self::new();
        source.clock.lock().duration = duration;
        source
    }

    pub fn is_playing(&self) -> bool {
        self.clock.lock().playing
    }

    /// Report (new) metadata. Emits a duration change even for non-finite
    /// values; listeners decide what to do with them.
    pub fn set_duration(&self, duration: f64) {
        {
            let mut clock = self.clock.lock();
            clock.duration = duration;
            clock.position = clock.clamp(clock.position);
        }
        self.durations.emit(&duration);
    }

    /// Move the clock forward by `dt` seconds if playing, then report the
    /// position. Playback stops at the end of a known duration. Returns the
    /// new position. Emits nothing when paused with no pending seek.
    pub fn advance(&self, dt: f64) -> f64 {
        let position = {
            let mut clock = self.clock.lock();
            let was_playing = clock.playing;
            if was_playing && dt.is_finite() && dt > 0.0 {
                clock.position += dt;
                if clock.duration_known() && clock.position >= clock.duration {
                    clock.position = clock.duration;
                    clock.playing  = false;
                }
            }
            if !was_playing && !clock.seek_pending {
                return clock.position;
            }
            clock.seek_pending = false;
            clock.position
        };
        self.positions.emit(&position);
        position
    }

    /// Jump to `time` and report it immediately, regardless of play state.
    pub fn report_position(&self, time: f64) {
        let position = {
            let mut clock = self.clock.lock();
            clock.position     = clock.clamp(time);
            clock.seek_pending = false;
            clock.position
        };
        self.positions.emit(&position);
    }

    pub fn fail(&self, error: MediaError) {
        self.errors.emit(&error);
    }

    /// Callbacks currently registered across all event kinds.
    pub fn listener_count(&self) -> usize {
        self.positions.len() + self.durations.len() + self.errors.len()
    }
}

impl MediaSource for SimulatedSource {
    fn current_time(&self) -> f64 {
        self.clock.lock().position
    }

    fn duration(&self) -> f64 {
        self.clock.lock().duration
    }

    fn set_current_time(&self, secs: f64) {
        let mut clock = self.clock.lock();
        clock.position     = clock.clamp(secs);
        clock.seek_pending = true;
    }

    fn play(&self) {
        let mut clock = self.clock.lock();
        // Playing from the very end restarts, like a finished <video>.
        if clock.duration_known() && clock.position >= clock.duration {
            clock.position     = 0.0;
            clock.seek_pending = true;
        }
        clock.playing = true;
    }

    fn pause(&self) {
        self.clock.lock().playing = false;
    }

    fn on_position_update(&self, callback: PositionCallback) -> Subscription {
        self.positions.add(move |t| callback(*t))
    }

    fn on_duration_change(&self, callback: DurationCallback) -> Subscription {
        self.durations.add(move |d| callback(*d))
    }

    fn on_error(&self, callback: ErrorCallback) -> Subscription {
        self.errors.add(move |e| callback(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder(source: &SimulatedSource) -> (Arc<Mutex<Vec<f64>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let sub = source.on_position_update(Box::new(move |t| s.lock().push(t)));
        (seen, sub)
    }

    #[test]
    fn paused_clock_is_silent() {
        let src = SimulatedSource::with_duration(10.0);
        let (seen, _sub) = recorder(&src);
        assert_eq!(src.advance(1.0), 0.0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn playing_clock_advances_and_stops_at_end() {
        let src = SimulatedSource::with_duration(2.0);
        let (seen, _sub) = recorder(&src);
        src.play();
        src.advance(0.5);
        src.advance(0.5);
        src.advance(5.0);
        assert_eq!(*seen.lock(), vec![0.5, 1.0, 2.0]);
        assert!(!src.is_playing());
    }

    #[test]
    fn seek_reports_on_next_tick_even_when_paused() {
        let src = SimulatedSource::with_duration(100.0);
        let (seen, _sub) = recorder(&src);
        src.set_current_time(42.0);
        assert!(seen.lock().is_empty());
        src.advance(0.1);
        src.advance(0.1);
        assert_eq!(*seen.lock(), vec![42.0]);
    }

    #[test]
    fn seeks_are_clamped() {
        let src = SimulatedSource::with_duration(30.0);
        src.set_current_time(-4.0);
        assert_eq!(src.current_time(), 0.0);
        src.set_current_time(99.0);
        assert_eq!(src.current_time(), 30.0);

        let unknown = SimulatedSource::new();
        unknown.set_current_time(99.0);
        assert_eq!(unknown.current_time(), 99.0);
        assert!(unknown.duration().is_nan());
    }

    #[test]
    fn play_at_end_restarts() {
        let src = SimulatedSource::with_duration(5.0);
        src.report_position(5.0);
        src.play();
        assert_eq!(src.current_time(), 0.0);
        assert!(src.is_playing());
    }

    #[test]
    fn duration_and_error_events() {
        let src = SimulatedSource::new();
        let durations = Arc::new(Mutex::new(Vec::new()));
        let d = durations.clone();
        let _ds = src.on_duration_change(Box::new(move |v| d.lock().push(v)));
        let errors = Arc::new(Mutex::new(0usize));
        let e = errors.clone();
        let _es = src.on_error(Box::new(move |_: &MediaError| *e.lock() += 1));

        src.set_duration(f64::INFINITY);
        src.set_duration(12.0);
        src.fail(MediaError::new(highreel_core::MediaErrorKind::Network, "segment 404", false));

        assert_eq!(durations.lock().len(), 2);
        assert_eq!(durations.lock()[1], 12.0);
        assert_eq!(*errors.lock(), 1);
        assert_eq!(src.listener_count(), 2);
    }
}
