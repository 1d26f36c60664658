// crates/highreel-core/src/helpers/time.rs
//
// TimeSpec parsing and human-readable timestamps.
//
// Highlight payloads arrive from the backend with loosely typed bounds:
// sometimes a number of seconds, sometimes "1:30" or "1:02:03" strings, and
// occasionally garbage. Everything in here is total: bad input becomes 0
// seconds so the timeline keeps rendering instead of failing the whole list.

use serde::{Deserialize, Serialize};

/// A moment in time as it appears in a raw highlight range.
///
/// Deserialized untagged from JSON: numbers become `Seconds`, strings become
/// `Text`, and any other JSON value lands in `Invalid` (which resolves to 0).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    Seconds(f64),
    /// `s`, `m:s` or `h:m:s`.
    Text(String),
    Invalid(serde_json::Value),
}

impl TimeSpec {
    /// Resolve to seconds. Never fails; see [`to_seconds`].
    pub fn to_seconds(&self) -> f64 {
        match self {
            TimeSpec::Seconds(s) if s.is_finite() => *s,
            TimeSpec::Seconds(_)                  => 0.0,
            TimeSpec::Text(text)                  => parse_clock(text),
            TimeSpec::Invalid(_)                  => 0.0,
        }
    }
}

impl Default for TimeSpec {
    fn default() -> Self { TimeSpec::Seconds(0.0) }
}

impl From<f64> for TimeSpec {
    fn from(s: f64) -> Self { TimeSpec::Seconds(s) }
}

impl From<&str> for TimeSpec {
    fn from(s: &str) -> Self { TimeSpec::Text(s.to_string()) }
}

impl From<String> for TimeSpec {
    fn from(s: String) -> Self { TimeSpec::Text(s) }
}

/// Convert a [`TimeSpec`] to seconds.
///
/// | Input                      | Result                     |
/// |----------------------------|----------------------------|
/// | finite number              | itself                     |
/// | non-finite / non-string    | `0`                        |
/// | `"s"`                      | `s`                        |
/// | `"m:s"`                    | `m*60 + s`                 |
/// | `"h:m:s"`                  | `h*3600 + m*60 + s`        |
/// | 4+ parts, empty or bad part| `0`                        |
///
/// ```
/// use highreel_core::helpers::time::{to_seconds, TimeSpec};
/// assert_eq!(to_seconds(&"1:30".into()),    90.0);
/// assert_eq!(to_seconds(&"1:02:03".into()), 3723.0);
/// assert_eq!(to_seconds(&"abc".into()),     0.0);
/// assert_eq!(to_seconds(&TimeSpec::Seconds(42.0)), 42.0);
/// ```
pub fn to_seconds(spec: &TimeSpec) -> f64 {
    spec.to_seconds()
}

fn parse_clock(text: &str) -> f64 {
    let mut nums = Vec::with_capacity(3);
    for part in text.trim().split(':').map(str::trim) {
        if part.is_empty() {
            return 0.0;
        }
        match part.parse::<f64>() {
            Ok(n) if n.is_finite() => nums.push(n),
            // One bad component invalidates the whole value.
            _ => return 0.0,
        }
    }

    let secs = match nums.as_slice() {
        [s]       => *s,
        [m, s]    => m * 60.0 + s,
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        _         => 0.0,
    };
    if secs.is_finite() { secs } else { 0.0 }
}

/// Format seconds as `m:ss`, or `h:mm:ss` once the value reaches an hour.
///
/// Minutes are unpadded unless hours are shown; seconds are always two
/// digits. Fractions are floored. Negative and non-finite input gives `0:00`.
///
/// ```
/// use highreel_core::helpers::time::format_time;
/// assert_eq!(format_time(90.0),     "1:30");
/// assert_eq!(format_time(3723.0),   "1:02:03");
/// assert_eq!(format_time(-1.0),     "0:00");
/// assert_eq!(format_time(f64::NAN), "0:00");
/// ```
pub fn format_time(total: f64) -> String {
    if !total.is_finite() || total < 0.0 {
        return "0:00".to_string();
    }
    let whole   = total.floor() as u64;
    let hours   = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let seconds = whole % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Label for the total-duration slot of the time row: `--:--` until the
/// source has reported a usable duration.
pub fn format_duration_label(duration: f64) -> String {
    if duration.is_finite() && duration > 0.0 {
        format_time(duration)
    } else {
        "--:--".to_string()
    }
}
