// crates/highreel-core/src/payload.rs
//
// Decoding the backend's highlight listing.
//
// The highlights endpoint answers with
//   { "stream_id": .., "stream_url": .., "status": .., "highlights": "<json>" }
// where `highlights` is itself a JSON-encoded array of ranges. Saved fixtures
// and hand-written files usually hold the bare array instead, so both shapes
// are accepted, and an already-decoded inline array is accepted too.
//
// Only document-level problems error here. Bad individual bounds are left for
// `timeline::normalize` to zero out or drop.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::timeline::RawRange;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HighlightList {
    /// JSON text, as the backend sends it.
    Encoded(String),
    Inline(Vec<RawRange>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightsPayload {
    #[serde(default)]
    pub stream_id:  Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub status:     Option<String>,
    pub highlights: HighlightList,
}

impl HighlightsPayload {
    pub fn ranges(&self) -> Result<Vec<RawRange>> {
        match &self.highlights {
            HighlightList::Inline(ranges) => Ok(ranges.clone()),
            HighlightList::Encoded(text)  => serde_json::from_str(text)
                .context("`highlights` field does not hold a JSON range list"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Bare(Vec<RawRange>),
    Payload(HighlightsPayload),
}

/// Parse either a bare range array or a full highlights payload.
pub fn parse_ranges_json(text: &str) -> Result<Vec<RawRange>> {
    let doc: Document = serde_json::from_str(text)
        .context("expected a range array or an object with a `highlights` field")?;
    match doc {
        Document::Bare(ranges)     => Ok(ranges),
        Document::Payload(payload) => payload.ranges(),
    }
}

/// Read and parse a highlight file from disk.
pub fn load_ranges(path: &Path) -> Result<Vec<RawRange>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading highlights from {}", path.display()))?;
    parse_ranges_json(&text).with_context(|| format!("parsing {}", path.display()))
}
