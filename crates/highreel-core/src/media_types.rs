// crates/highreel-core/src/media_types.rs
//
// Event payloads that flow between a media source, the tracker in
// highreel-media, and whatever front-end listens to it.
// No listeners or locks, just plain data.

use serde::{Deserialize, Serialize};

/// Active segment transition, emitted only when the active index changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentChange {
    pub previous: Option<usize>,
    /// `None` when playback left every segment.
    pub current:  Option<usize>,
    /// Position (seconds) of the update that caused the transition.
    pub time:     f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaErrorKind {
    Network,
    Decode,
    Aborted,
    Other,
}

/// Failure reported by a media source through its error event.
/// The tracker observes these but never produces or swallows them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaError {
    pub kind:    MediaErrorKind,
    pub message: String,
    /// Playback cannot continue without the source recovering or reloading.
    pub fatal:   bool,
}

impl MediaError {
    pub fn new(kind: MediaErrorKind, message: impl Into<String>, fatal: bool) -> Self {
        Self { kind, message: message.into(), fatal }
    }
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sev = if self.fatal { "fatal" } else { "recoverable" };
        write!(f, "{:?} error ({sev}): {}", self.kind, self.message)
    }
}

impl std::error::Error for MediaError {}
