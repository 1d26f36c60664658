// crates/highreel-cli/src/app.rs
//
// Subcommand handlers. Each one loads what it needs, runs the engine, and
// prints to stdout; logging goes to stderr through tracing.
//
// `play` is the headless stand-in for the player page: a SimulatedSource is
// the <video>, the tracker drives the "now showing" highlight, and the text
// bar is the highlight bar with its playhead.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use highreel_core::helpers::geometry::{progress_pct, project, SegmentGeometry};
use highreel_core::helpers::time::{format_duration_label, format_time, TimeSpec};
use highreel_core::payload::load_ranges;
use highreel_core::timeline::{normalize, NormalizedTimeline};
use highreel_media::{MediaSource, PlaybackTracker, SegmentChange, SimulatedSource};

use crate::helpers::format::{fit_label, render_bar};

const LABEL_COLUMN: usize = 24;

// ── inspect ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct InspectReport<'a> {
    segments: &'a NormalizedTimeline,
    dropped:  usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    geometry: Vec<SegmentGeometry>,
}

pub fn inspect(file: &Path, duration: Option<f64>, json: bool) -> Result<()> {
    let ranges   = load_ranges(file)?;
    let timeline = normalize(&ranges);
    let dropped  = ranges.len() - timeline.len();
    let geometry = duration.map(|d| project(&timeline, d)).unwrap_or_default();
    tracing::debug!(raw = ranges.len(), kept = timeline.len(), "normalized {}", file.display());

    if json {
        let report = InspectReport { segments: &timeline, dropped, geometry };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, seg) in timeline.iter().enumerate() {
        let label = fit_label(&seg.label(i), LABEL_COLUMN);
        print!("{i:>3}  {label:<width$}  {}", seg.range_label(), width = LABEL_COLUMN);
        if let Some(g) = geometry.get(i) {
            print!("  left {:.2}%  width {:.2}%", g.left_pct, g.width_pct);
        }
        println!();
    }
    println!(
        "{} segment(s), {} dropped, {} highlighted",
        timeline.len(),
        dropped,
        format_time(timeline.total_span()),
    );
    Ok(())
}

// ── play ─────────────────────────────────────────────────────────────────────

pub struct PlayOptions<'a> {
    pub file:     &'a Path,
    pub duration: f64,
    pub step:     f64,
    pub range:    Option<(TimeSpec, TimeSpec)>,
    pub width:    usize,
}

pub fn play(opts: PlayOptions<'_>) -> Result<()> {
    if !(opts.duration.is_finite() && opts.duration > 0.0) {
        bail!("--duration must be a positive number of seconds");
    }
    if !(opts.step.is_finite() && opts.step > 0.0) {
        bail!("--step must be a positive number of seconds");
    }

    let ranges  = load_ranges(opts.file)?;
    let source  = Arc::new(SimulatedSource::with_duration(opts.duration));
    let tracker = PlaybackTracker::new();
    let feed    = tracker.segment_changes();
    tracker.attach(source.as_ref(), &ranges);

    let timeline = tracker.timeline().unwrap_or_default();
    let geometry = project(&timeline, opts.duration);

    match &opts.range {
        Some((from, until)) => tracker.play_range(&source, from, until),
        None                => source.play(),
    }

    // Upper bound on ticks so a misbehaving source can never spin forever.
    let max_ticks = (opts.duration / opts.step).ceil() as u64 + 2;
    let mut ticks = 0;
    while source.is_playing() && ticks < max_ticks {
        let now = source.advance(opts.step);
        for change in feed.drain() {
            print_change(&timeline, &change);
            println!("      {}", render_bar(&geometry, progress_pct(now, opts.duration), opts.width));
        }
        ticks += 1;
    }

    let state = tracker.state().unwrap_or_default();
    println!(
        "stopped at {} / {} ({:.1}%)",
        format_time(state.current_time()),
        format_duration_label(state.duration()),
        state.progress_pct(),
    );
    tracker.detach();
    Ok(())
}

fn print_change(timeline: &NormalizedTimeline, change: &SegmentChange) {
    let at = format_time(change.time);
    match change.current.and_then(|i| timeline.segment(i).map(|s| (i, s))) {
        Some((i, seg)) => println!("[{at}] > {}  ({})", seg.label(i), seg.range_label()),
        None           => println!("[{at}] . no highlight"),
    }
}

// ── time ─────────────────────────────────────────────────────────────────────

pub fn time(specs: &[String]) -> Result<()> {
    for raw in specs {
        let secs = TimeSpec::from(raw.as_str()).to_seconds();
        println!("{raw}\t{secs}\t{}", format_time(secs));
    }
    Ok(())
}
