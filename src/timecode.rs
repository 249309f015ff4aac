/*!
 * Timestamp conversion between caption and script formats.
 *
 * Source captions carry `HH:MM:SS,mmm` (or `.` as separator, and any number of fraction
 * digits). Script events want `H:MM:SS.CC` in centiseconds. The two formats have
 * different field widths and resolutions, so `format_as_centiseconds` is not the
 * inverse of `parse_timestamp`: a round trip is only exact to the nearest 10ms.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranscodeError;

/// Milliseconds since the start of the media
pub type Milliseconds = u64;

// @const: Caption timestamp regex (fraction normalized to 3 digits after matching)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d+):(\d+)[,.](\d+)$").unwrap()
});

/// Parse a caption timestamp into milliseconds.
///
/// The fraction is right-padded with zeros and truncated to 3 digits, so
/// `"1:2:3.5"` is 3 723 500 ms, not 3 723 005 ms.
pub fn parse_timestamp(text: &str) -> Result<Milliseconds, TranscodeError> {
    let trimmed = text.trim();
    let malformed = || TranscodeError::MalformedTimestamp(trimmed.to_string());

    let caps = TIMESTAMP_REGEX.captures(trimmed).ok_or_else(malformed)?;

    let field = |idx: usize| -> Result<u64, TranscodeError> {
        caps[idx].parse::<u64>().map_err(|_| malformed())
    };
    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;

    let mut fraction: String = caps[4].chars().take(3).collect();
    while fraction.len() < 3 {
        fraction.push('0');
    }
    let millis: u64 = fraction.parse().map_err(|_| malformed())?;

    hours
        .checked_mul(3_600_000)
        .and_then(|h| h.checked_add(minutes.checked_mul(60_000)?))
        .and_then(|hm| hm.checked_add(seconds.checked_mul(1_000)?))
        .and_then(|hms| hms.checked_add(millis))
        .ok_or_else(malformed)
}

/// Format milliseconds as a script event time, `H:MM:SS.CC`.
///
/// Milliseconds are rounded to the nearest centisecond; a carry propagates into
/// the seconds field so the centisecond part always stays within 0..=99.
pub fn format_as_centiseconds(ms: Milliseconds) -> String {
    let total_cs = ms.saturating_add(5) / 10;
    let hours = total_cs / 360_000;
    let minutes = (total_cs / 6_000) % 60;
    let seconds = (total_cs / 100) % 60;
    let centis = total_cs % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Format milliseconds as a wall clock duration, `HH:MM:SS` (sub-second part dropped)
pub fn format_as_clock(ms: Milliseconds) -> String {
    let total_secs = ms / 1_000;
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3_600,
        (total_secs / 60) % 60,
        total_secs % 60
    )
}
