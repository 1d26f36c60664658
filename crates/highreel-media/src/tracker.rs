// crates/highreel-media/src/tracker.rs
//
// PlaybackTracker: binds a NormalizedTimeline to a live MediaSource and turns
// its continuous position updates into discrete segment-change events.
//
// Lifecycle:
//   Detached ──attach(source, ranges)──▶ Attached { duration_known }
//   Attached ──detach() / drop────────▶ Detached
//
// Shared state layout:
//   PlaybackTracker
//     ├── shared: Arc<Mutex<TrackerInner>>
//     │     ├── epoch      : bumped on every attach/detach; callbacks carry the
//     │     │                epoch they were installed under and go inert
//     │     │                once it moves on
//     │     ├── session    : timeline + PlaybackState + source subscriptions
//     │     └── end_watch  : at most one pending "pause at end" watch
//     └── changes          : segment-change listeners (survive re-attach)
//
// Callbacks handed to the source hold only a Weak to `shared`. No lock is held
// while user callbacks run, so a segment-change listener may call detach(),
// attach() or seek_and_queue_pause() on this tracker.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver};
use parking_lot::Mutex;
use uuid::Uuid;

use highreel_core::helpers::time::TimeSpec;
use highreel_core::media_types::{MediaError, SegmentChange};
use highreel_core::state::PlaybackState;
use highreel_core::timeline::{normalize, NormalizedTimeline, RawRange};

use crate::listeners::{Listeners, Subscription};
use crate::source::{DurationCallback, MediaSource, PositionCallback};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerPhase {
    Detached,
    Attached { duration_known: bool },
}

struct Session {
    timeline:      NormalizedTimeline,
    state:         PlaybackState,
    subscriptions: Vec<Subscription>,
}

struct EndWatch {
    id:           Uuid,
    end:          f64,
    subscription: Subscription,
}

#[derive(Default)]
struct TrackerInner {
    epoch:     u64,
    session:   Option<Session>,
    end_watch: Option<EndWatch>,
}

pub struct PlaybackTracker {
    shared:  Arc<Mutex<TrackerInner>>,
    changes: Listeners<SegmentChange>,
}

impl Default for PlaybackTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackTracker {
    pub fn new() -> Self {
        Self {
            shared:  Arc::new(Mutex::new(TrackerInner::default())),
            changes: Listeners::new(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Bind to `source` with a fresh timeline built from `ranges`.
    ///
    /// Re-attaching detaches first. The initial position and (if already
    /// known) duration are read from the source, and the active segment is
    /// resolved against that position without notifying listeners.
    pub fn attach<S: MediaSource + ?Sized>(&self, source: &S, ranges: &[RawRange]) {
        self.detach();

        let timeline = normalize(ranges);
        let dropped  = ranges.len() - timeline.len();
        let state    = PlaybackState::seeded(&timeline, source.current_time(), source.duration());
        tracing::debug!(
            segments = timeline.len(),
            dropped,
            duration = state.duration(),
            "tracker attached"
        );

        let epoch = {
            let mut inner = self.shared.lock();
            inner.epoch += 1;
            inner.session = Some(Session { timeline, state, subscriptions: Vec::new() });
            inner.epoch
        };

        let subscriptions = vec![
            source.on_position_update(self.position_handler(epoch)),
            source.on_duration_change(self.duration_handler(epoch)),
            source.on_error(Box::new(|err: &MediaError| {
                tracing::warn!(kind = ?err.kind, fatal = err.fatal, "media source error: {}", err.message);
            })),
        ];

        let mut inner = self.shared.lock();
        if inner.epoch == epoch {
            if let Some(session) = inner.session.as_mut() {
                session.subscriptions = subscriptions;
                return;
            }
        }
        // Superseded while subscribing; let the handles release on drop.
        drop(inner);
        drop(subscriptions);
    }

    /// Release every source subscription, including a pending end watch.
    /// Once this returns no callback of this tracker fires again until the
    /// next attach. Safe to call from inside any of the tracker's callbacks.
    pub fn detach(&self) {
        let (session, watch) = {
            let mut inner = self.shared.lock();
            inner.epoch += 1;
            (inner.session.take(), inner.end_watch.take())
        };

        if let Some(mut session) = session {
            for sub in session.subscriptions.iter_mut() {
                sub.dispose();
            }
            session.subscriptions.clear();
            tracing::debug!("tracker detached");
        }
        if let Some(mut watch) = watch {
            watch.subscription.dispose();
        }
    }

    pub fn phase(&self) -> TrackerPhase {
        match &self.shared.lock().session {
            None    => TrackerPhase::Detached,
            Some(s) => TrackerPhase::Attached { duration_known: s.state.duration_known() },
        }
    }

    pub fn is_attached(&self) -> bool {
        self.shared.lock().session.is_some()
    }

    /// Snapshot of the current playback state; `None` while detached.
    pub fn state(&self) -> Option<PlaybackState> {
        self.shared.lock().session.as_ref().map(|s| s.state)
    }

    pub fn timeline(&self) -> Option<NormalizedTimeline> {
        self.shared.lock().session.as_ref().map(|s| s.timeline.clone())
    }

    // ── Notifications ────────────────────────────────────────────────────────

    /// Called whenever the active segment changes, including to `None`.
    /// Registrations outlive detach/attach cycles.
    pub fn on_segment_change(
        &self,
        callback: impl Fn(&SegmentChange) + Send + Sync + 'static,
    ) -> Subscription {
        self.changes.add(callback)
    }

    /// Queue segment changes on a channel instead of receiving callbacks,
    /// for front-ends that drain events once per frame.
    pub fn segment_changes(&self) -> SegmentChangeFeed {
        let (tx, rx) = unbounded();
        let subscription = self.changes.add(move |change: &SegmentChange| {
            // Receiver gone means the feed is being dropped.
            let _ = tx.send(*change);
        });
        SegmentChangeFeed { rx, _subscription: subscription }
    }

    fn position_handler(&self, epoch: u64) -> PositionCallback {
        let shared  = Arc::downgrade(&self.shared);
        let changes = self.changes.clone();
        Box::new(move |time| {
            let Some(shared) = shared.upgrade() else { return };
            let change = {
                let mut inner = shared.lock();
                if inner.epoch != epoch {
                    return;
                }
                let Some(session) = inner.session.as_mut() else { return };
                session.state.apply_position(session.timeline.segments(), time)
            };
            if let Some(change) = change {
                tracing::trace!(
                    time,
                    previous = ?change.previous,
                    current = ?change.current,
                    "active segment changed"
                );
                changes.emit_while(&change, || shared.lock().epoch == epoch);
            }
        })
    }

    fn duration_handler(&self, epoch: u64) -> DurationCallback {
        let shared = Arc::downgrade(&self.shared);
        Box::new(move |duration| {
            let Some(shared) = shared.upgrade() else { return };
            let mut inner = shared.lock();
            if inner.epoch != epoch {
                return;
            }
            if let Some(session) = inner.session.as_mut() {
                if session.state.apply_duration(duration) {
                    tracing::debug!(duration, "duration changed");
                }
            }
        })
    }

    // ── Seeking ──────────────────────────────────────────────────────────────

    /// Seek `source` to `start`, pause, and pause again once playback
    /// reaches `end` (the user presses play to watch the range).
    ///
    /// Any previously queued end watch is removed first, so repeated calls
    /// never stack up pauses.
    pub fn seek_and_queue_pause<S>(&self, source: &Arc<S>, start: &TimeSpec, end: &TimeSpec)
    where
        S: MediaSource + ?Sized + 'static,
    {
        let (start, end) = (start.to_seconds(), end.to_seconds());
        self.cancel_end_watch();
        source.set_current_time(start);
        source.pause();
        self.install_end_watch(source, end);
    }

    /// Like [`seek_and_queue_pause`](Self::seek_and_queue_pause) but starts
    /// playback right away: plays `[start, end)` and stops.
    pub fn play_range<S>(&self, source: &Arc<S>, start: &TimeSpec, end: &TimeSpec)
    where
        S: MediaSource + ?Sized + 'static,
    {
        let (start, end) = (start.to_seconds(), end.to_seconds());
        self.cancel_end_watch();
        source.set_current_time(start);
        self.install_end_watch(source, end);
        source.play();
    }

    /// Drop a pending end watch without pausing. Returns whether one existed.
    pub fn cancel_end_watch(&self) -> bool {
        let watch = self.shared.lock().end_watch.take();
        watch.is_some()
    }

    /// End time of the pending watch, if any.
    pub fn pending_end(&self) -> Option<f64> {
        self.shared.lock().end_watch.as_ref().map(|w| w.end)
    }

    fn install_end_watch<S>(&self, source: &Arc<S>, end: f64)
    where
        S: MediaSource + ?Sized + 'static,
    {
        let id     = Uuid::new_v4();
        let shared = Arc::downgrade(&self.shared);
        let target = Arc::downgrade(source);

        let subscription = source.on_position_update(Box::new(move |time| {
            if time.is_nan() || time < end {
                return;
            }
            let Some(shared) = shared.upgrade() else { return };
            let watch = {
                let mut inner = shared.lock();
                if inner.end_watch.as_ref().map(|w| w.id) != Some(id) {
                    return;
                }
                inner.end_watch.take()
            };
            if let Some(source) = target.upgrade() {
                source.pause();
            }
            tracing::debug!(time, end, "end watch reached, paused");
            drop(watch);
        }));

        let previous = self.shared.lock().end_watch.replace(EndWatch { id, end, subscription });
        drop(previous);
    }
}

impl Drop for PlaybackTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Channel-backed segment-change subscription. Unsubscribes on drop.
pub struct SegmentChangeFeed {
    rx:            Receiver<SegmentChange>,
    _subscription: Subscription,
}

impl SegmentChangeFeed {
    pub fn try_recv(&self) -> Option<SegmentChange> {
        self.rx.try_recv().ok()
    }

    /// Everything queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<SegmentChange> {
        self.rx.try_iter().collect()
    }

    pub fn receiver(&self) -> &Receiver<SegmentChange> {
        &self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedSource;
    use highreel_core::media_types::MediaErrorKind;

    fn record(tracker: &PlaybackTracker) -> (Arc<Mutex<Vec<SegmentChange>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let sub = tracker.on_segment_change(move |c| s.lock().push(*c));
        (seen, sub)
    }

    fn five_to_ten() -> Vec<RawRange> {
        vec![RawRange::new(5.0, 10.0)]
    }

    #[test]
    fn notifies_only_on_transitions() {
        let src = SimulatedSource::with_duration(100.0);
        let tracker = PlaybackTracker::new();
        let (seen, _sub) = record(&tracker);
        tracker.attach(&src, &five_to_ten());

        for t in [0.0, 4.0, 6.0, 9.0, 11.0] {
            src.report_position(t);
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].current, seen[0].time), (Some(0), 6.0));
        assert_eq!((seen[1].current, seen[1].time), (None, 11.0));
        assert_eq!(seen[1].previous, Some(0));
    }

    #[test]
    fn state_follows_the_source() {
        let src = SimulatedSource::new();
        let tracker = PlaybackTracker::new();
        assert_eq!(tracker.phase(), TrackerPhase::Detached);
        assert_eq!(tracker.state(), None);

        tracker.attach(&src, &five_to_ten());
        assert_eq!(tracker.phase(), TrackerPhase::Attached { duration_known: false });
        assert_eq!(tracker.state().unwrap().duration(), 0.0);

        src.set_duration(f64::NAN);
        assert_eq!(tracker.state().unwrap().duration(), 0.0);
        src.set_duration(60.0);
        assert_eq!(tracker.phase(), TrackerPhase::Attached { duration_known: true });

        src.report_position(7.5);
        let state = tracker.state().unwrap();
        assert_eq!(state.current_time(), 7.5);
        assert_eq!(state.active_segment(), Some(0));
        assert_eq!(state.progress_pct(), 12.5);
    }

    #[test]
    fn attach_reads_already_loaded_metadata() {
        let src = SimulatedSource::with_duration(80.0);
        src.report_position(3.0);
        let tracker = PlaybackTracker::new();
        tracker.attach(&src, &[]);
        let state = tracker.state().unwrap();
        assert_eq!(state.duration(), 80.0);
        assert_eq!(state.current_time(), 3.0);
        assert_eq!(state.active_segment(), None);
    }

    #[test]
    fn attach_mid_segment_starts_active_without_notifying() {
        let src = SimulatedSource::with_duration(100.0);
        src.report_position(7.0);
        let tracker = PlaybackTracker::new();
        let (seen, _sub) = record(&tracker);
        tracker.attach(&src, &five_to_ten());

        let state = tracker.state().unwrap();
        assert_eq!(state.current_time(), 7.0);
        assert_eq!(state.active_segment(), Some(0));
        assert!(seen.lock().is_empty());

        src.report_position(8.0);
        assert!(seen.lock().is_empty());
        src.report_position(10.0);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0].previous, Some(0));
    }

    #[test]
    fn live_duration_resets_to_unknown() {
        let src = SimulatedSource::new();
        let tracker = PlaybackTracker::new();
        tracker.attach(&src, &five_to_ten());

        src.set_duration(60.0);
        assert_eq!(tracker.phase(), TrackerPhase::Attached { duration_known: true });
        src.set_duration(f64::INFINITY);
        assert_eq!(tracker.state().unwrap().duration(), 0.0);
        assert_eq!(tracker.phase(), TrackerPhase::Attached { duration_known: false });
    }

    #[test]
    fn detach_releases_every_source_listener() {
        let src = Arc::new(SimulatedSource::with_duration(100.0));
        let tracker = PlaybackTracker::new();
        let (seen, _sub) = record(&tracker);

        tracker.attach(src.as_ref(), &five_to_ten());
        tracker.seek_and_queue_pause(&src, &0.0.into(), &50.0.into());
        assert_eq!(src.listener_count(), 4);

        tracker.detach();
        assert_eq!(src.listener_count(), 0);
        assert!(!tracker.is_attached());
        assert_eq!(tracker.pending_end(), None);

        src.report_position(6.0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn reattach_replaces_subscriptions() {
        let first  = SimulatedSource::with_duration(100.0);
        let second = SimulatedSource::with_duration(100.0);
        let tracker = PlaybackTracker::new();
        let (seen, _sub) = record(&tracker);

        tracker.attach(&first, &five_to_ten());
        tracker.attach(&second, &[RawRange::new(20.0, 30.0)]);
        assert_eq!(first.listener_count(), 0);
        assert_eq!(second.listener_count(), 3);

        first.report_position(6.0);
        assert!(seen.lock().is_empty());
        second.report_position(25.0);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(tracker.timeline().unwrap()[0].start, 20.0);
    }

    #[test]
    fn detach_from_inside_a_callback_silences_later_listeners() {
        let src = SimulatedSource::with_duration(100.0);
        let tracker = Arc::new(PlaybackTracker::new());

        let t = Arc::downgrade(&tracker);
        let _detacher = tracker.on_segment_change(move |_| {
            if let Some(t) = t.upgrade() {
                t.detach();
            }
        });
        let (seen, _sub) = record(&tracker);

        tracker.attach(&src, &five_to_ten());
        src.report_position(6.0);

        assert!(!tracker.is_attached());
        assert!(seen.lock().is_empty());
        assert_eq!(src.listener_count(), 0);
    }

    #[test]
    fn dropping_the_tracker_detaches() {
        let src = SimulatedSource::with_duration(100.0);
        {
            let tracker = PlaybackTracker::new();
            tracker.attach(&src, &five_to_ten());
            assert_eq!(src.listener_count(), 3);
        }
        assert_eq!(src.listener_count(), 0);
        src.report_position(6.0);
    }

    #[test]
    fn seek_and_queue_pause_stops_at_end_once() {
        let src = Arc::new(SimulatedSource::with_duration(100.0));
        let tracker = PlaybackTracker::new();
        tracker.attach(src.as_ref(), &five_to_ten());

        src.play();
        tracker.seek_and_queue_pause(&src, &"0:05".into(), &"0:08".into());
        assert_eq!(src.current_time(), 5.0);
        assert!(!src.is_playing());
        assert_eq!(tracker.pending_end(), Some(8.0));

        src.play();
        src.advance(1.0);
        assert!(src.is_playing());
        src.advance(2.5);
        assert!(!src.is_playing());
        assert_eq!(tracker.pending_end(), None);

        // One-shot: playing on past the end is not interrupted again.
        src.play();
        src.advance(1.0);
        assert!(src.is_playing());
    }

    #[test]
    fn repeated_seeks_keep_a_single_watch() {
        let src = Arc::new(SimulatedSource::with_duration(100.0));
        let tracker = PlaybackTracker::new();

        tracker.seek_and_queue_pause(&src, &10.0.into(), &12.0.into());
        tracker.seek_and_queue_pause(&src, &30.0.into(), &40.0.into());
        assert_eq!(src.listener_count(), 1);
        assert_eq!(tracker.pending_end(), Some(40.0));

        // 12 s lies behind the new range; the stale watch must not pause at 31.
        src.play();
        src.advance(1.0);
        assert!(src.is_playing());
        src.advance(10.0);
        assert!(!src.is_playing());
        assert_eq!(src.listener_count(), 0);
    }

    #[test]
    fn play_range_plays_then_pauses() {
        let src = Arc::new(SimulatedSource::with_duration(100.0));
        let tracker = PlaybackTracker::new();
        tracker.play_range(&src, &"1:10".into(), &"1:25".into());
        assert!(src.is_playing());
        assert_eq!(src.current_time(), 70.0);

        for _ in 0..20 {
            src.advance(1.0);
        }
        assert!(!src.is_playing());
        assert_eq!(src.current_time(), 85.0);
    }

    #[test]
    fn cancel_end_watch_leaves_playback_alone() {
        let src = Arc::new(SimulatedSource::with_duration(100.0));
        let tracker = PlaybackTracker::new();
        tracker.play_range(&src, &0.0.into(), &1.0.into());
        assert!(tracker.cancel_end_watch());
        assert!(!tracker.cancel_end_watch());
        src.advance(2.0);
        assert!(src.is_playing());
    }

    #[test]
    fn works_through_a_trait_object() {
        let src = Arc::new(SimulatedSource::with_duration(100.0));
        let dyn_src: Arc<dyn MediaSource> = src.clone();
        let tracker = PlaybackTracker::new();
        tracker.attach(dyn_src.as_ref(), &five_to_ten());
        tracker.seek_and_queue_pause(&dyn_src, &5.0.into(), &6.0.into());
        src.play();
        src.advance(1.5);
        assert!(!src.is_playing());
    }

    #[test]
    fn source_errors_do_not_touch_state() {
        let src = SimulatedSource::with_duration(100.0);
        let tracker = PlaybackTracker::new();
        tracker.attach(&src, &five_to_ten());
        src.report_position(6.0);
        let before = tracker.state();

        src.fail(MediaError::new(MediaErrorKind::Decode, "bad frame", true));
        assert_eq!(tracker.state(), before);
        assert!(tracker.is_attached());
    }

    #[test]
    fn feed_collects_changes() {
        let src = SimulatedSource::with_duration(100.0);
        let tracker = PlaybackTracker::new();
        let feed = tracker.segment_changes();
        tracker.attach(&src, &[RawRange::new(0.0, 10.0), RawRange::new(5.0, 15.0)]);

        src.report_position(1.0);
        src.report_position(7.0);
        src.report_position(12.0);
        src.report_position(20.0);

        let got: Vec<_> = feed.drain().into_iter().map(|c| c.current).collect();
        assert_eq!(got, vec![Some(0), Some(1), None]);
        assert_eq!(feed.try_recv(), None);
    }
}
