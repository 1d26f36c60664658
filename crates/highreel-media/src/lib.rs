// crates/highreel-media/src/lib.rs
//
// The stateful half of highreel. highreel-core decides *what* changed; this
// crate wires those decisions to a live media source and hands results to the
// front-end through callbacks or a channel.
//
// To support a new kind of player:
//   1. Implement `MediaSource` for a handle to it
//   2. Pass that handle to `PlaybackTracker::attach`
// Nothing else in the crate needs to change.

pub mod listeners;
pub mod sim;
pub mod source;
pub mod tracker;

// Re-export the main public API so highreel-cli imports are simple.
pub use listeners::{Listeners, Subscription};
pub use sim::SimulatedSource;
pub use source::MediaSource;
pub use tracker::{PlaybackTracker, SegmentChangeFeed, TrackerPhase};
pub use highreel_core::media_types::{MediaError, MediaErrorKind, SegmentChange};
