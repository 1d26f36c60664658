// crates/highreel-core/src/timeline.rs
//
// Raw highlight ranges → validated segments, and "which segment is under the
// playhead" resolution.
//
// Everything here is a pure function of its inputs. The tracker in
// highreel-media calls `normalize` once per attach and `find_active_segment`
// on every position update; the CLI calls both directly.

use serde::{Deserialize, Serialize};

use crate::helpers::time::{format_time, TimeSpec};

/// Display metadata carried by a highlight. Never inspected by the engine;
/// copied from the raw range onto the normalized segment as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title:     Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption:   Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// One highlight range exactly as the backend sent it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRange {
    #[serde(default)]
    pub start: TimeSpec,
    #[serde(default)]
    pub end:   TimeSpec,
    #[serde(flatten)]
    pub meta:  HighlightMeta,
}

impl RawRange {
    pub fn new(start: impl Into<TimeSpec>, end: impl Into<TimeSpec>) -> Self {
        Self { start: start.into(), end: end.into(), meta: HighlightMeta::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }
}

/// A validated `[start, end)` range in seconds. `start >= 0` and
/// `start < end` hold for every segment produced by [`normalize`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end:   f64,
    #[serde(flatten)]
    pub meta:  HighlightMeta,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end, meta: HighlightMeta::default() }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// End-exclusive containment: a segment is no longer active at `end`.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Sidebar title: the payload's `title`, or `Highlight N` (1-based).
    pub fn label(&self, index: usize) -> String {
        self.meta.title.clone().unwrap_or_else(|| format!("Highlight {}", index + 1))
    }

    /// Sidebar subtitle, e.g. `Start: 0:05 End: 0:08`.
    ///
    /// Built from the normalized seconds, not the payload text, so `"0:5"`,
    /// `5` and `"0:05"` all print as `0:05`.
    pub fn range_label(&self) -> String {
        format!("Start: {} End: {}", format_time(self.start), format_time(self.end))
    }
}

/// Ordered list of valid segments. Order is the payload order: it drives the
/// sidebar listing and breaks ties between overlapping segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedTimeline(Vec<Segment>);

impl NormalizedTimeline {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of segment lengths. Overlaps are counted twice.
    pub fn total_span(&self) -> f64 {
        self.0.iter().map(Segment::span).sum()
    }

    pub fn find_active(&self, time: f64) -> Option<usize> {
        find_active_segment(&self.0, time)
    }
}

impl std::ops::Deref for NormalizedTimeline {
    type Target = [Segment];
    fn deref(&self) -> &[Segment] { &self.0 }
}

/// Convert raw ranges into a [`NormalizedTimeline`].
///
/// Each bound goes through [`TimeSpec::to_seconds`] and is clamped to be
/// non-negative. Pairs with `start >= end` are dropped (not kept as
/// zero-length segments). Relative order of the survivors is preserved.
///
/// ```
/// use highreel_core::timeline::{normalize, RawRange};
/// let t = normalize(&[RawRange::new("0:05", "0:08"), RawRange::new("5", "5")]);
/// assert_eq!(t.len(), 1);
/// assert_eq!((t[0].start, t[0].end), (5.0, 8.0));
/// ```
pub fn normalize(ranges: &[RawRange]) -> NormalizedTimeline {
    let segments = ranges
        .iter()
        .filter_map(|r| {
            let start = r.start.to_seconds().max(0.0);
            let end   = r.end.to_seconds().max(0.0);
            (start < end).then(|| Segment { start, end, meta: r.meta.clone() })
        })
        .collect();
    NormalizedTimeline(segments)
}

/// Index of the segment containing `time`, or `None`.
///
/// Containment is end-exclusive. When segments overlap the **last** match in
/// timeline order wins, so a later, more specific highlight takes over from
/// an earlier one that spans it.
///
/// ```
/// use highreel_core::timeline::{find_active_segment, Segment};
/// let segs = [Segment::new(0.0, 10.0), Segment::new(5.0, 15.0)];
/// assert_eq!(find_active_segment(&segs, 7.0),  Some(1));
/// assert_eq!(find_active_segment(&segs, 15.0), None);
/// ```
pub fn find_active_segment(segments: &[Segment], time: f64) -> Option<usize> {
    segments.iter().rposition(|s| s.contains(time))
}
