// crates/highreel-media/src/source.rs
//
// The boundary to whatever actually plays the video: a browser <video>
// element behind an HLS library, a native decoder, or the in-memory
// `SimulatedSource`. The tracker only ever talks to this trait.

use highreel_core::media_types::MediaError;

use crate::listeners::Subscription;

pub type PositionCallback = Box<dyn Fn(f64) + Send + Sync>;
pub type DurationCallback = Box<dyn Fn(f64) + Send + Sync>;
pub type ErrorCallback    = Box<dyn Fn(&MediaError) + Send + Sync>;

/// A playable media element.
///
/// Methods take `&self`; implementations use interior mutability, the same
/// way a shared handle to a platform media element behaves. Event callbacks
/// must not be invoked synchronously from inside `set_current_time`, `play`
/// or `pause`, mirroring how platform players queue their events.
pub trait MediaSource: Send + Sync {
    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    /// Total duration in seconds, or NaN until metadata has loaded.
    fn duration(&self) -> f64;

    /// Seek. The source clamps to its own valid range.
    fn set_current_time(&self, secs: f64);

    fn play(&self);

    fn pause(&self);

    fn on_position_update(&self, callback: PositionCallback) -> Subscription;

    /// Fired when metadata loads and whenever the duration changes. The value
    /// may be non-finite (live streams, unknown length).
    fn on_duration_change(&self, callback: DurationCallback) -> Subscription;

    fn on_error(&self, callback: ErrorCallback) -> Subscription;
}
