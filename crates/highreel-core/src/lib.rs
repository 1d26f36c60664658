// crates/highreel-core/src/lib.rs
//
// Pure timeline data for highreel: no listeners, no logging, no runtime
// handles. highreel-media drives these types from a live media source;
// highreel-cli prints them.
//
// Layout:
//   helpers::time      : TimeSpec parsing, m:ss / h:mm:ss formatting
//   helpers::geometry  : highlight-bar percentages, click-to-seek
//   timeline           : RawRange → NormalizedTimeline, active-segment lookup
//   state              : PlaybackState transitions
//   media_types        : SegmentChange / MediaError event payloads
//   payload            : backend highlight listing decoding

pub mod helpers;
pub mod media_types;
pub mod payload;
pub mod state;
pub mod timeline;

pub use helpers::geometry::{progress_pct, project, SegmentGeometry};
pub use helpers::time::{format_time, to_seconds, TimeSpec};
pub use media_types::{MediaError, MediaErrorKind, SegmentChange};
pub use state::PlaybackState;
pub use timeline::{find_active_segment, normalize, NormalizedTimeline, RawRange, Segment};
