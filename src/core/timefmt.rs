// werview - core/timefmt.rs
//
// FILETIME-style timestamp rendering.
//
// WER stores event and upload times as a count of 100-nanosecond intervals
// since 1601-01-01T00:00:00Z. All arithmetic stays in 64-bit integers; the
// tick count does not fit in 32 bits.

use chrono::{DateTime, Local};

/// FILETIME tick value of the Unix epoch (1970-01-01T00:00:00Z).
/// 369 years of 100 ns intervals between the two epochs.
const UNIX_EPOCH_FILETIME_TICKS: i64 = 116_444_736_000_000_000;

/// Ticks are 100 ns; microseconds are 1000 ns.
const TICKS_PER_MICROSECOND: i64 = 10;

/// Display format for readable timestamps. `%Z` renders the local UTC
/// offset; the zone label is display-only.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %Z";

/// Render a FILETIME tick count as a readable local-time string,
/// e.g. `2024-01-15 23:30:22.123456 +09:00`.
///
/// Returns `None` when the tick count falls outside the range chrono can
/// represent (it never does for real report data).
pub fn format_ticks(ticks: i64) -> Option<String> {
    let micros = (ticks - UNIX_EPOCH_FILETIME_TICKS) / TICKS_PER_MICROSECOND;
    let utc = DateTime::from_timestamp_micros(micros)?;
    Some(utc.with_timezone(&Local).format(DISPLAY_FORMAT).to_string())
}

/// Render a raw tick-count field value (decimal string) as a readable
/// local-time string. Non-numeric input yields `None`; the normalizer
/// substitutes its sentinel and records a warning.
pub fn format_raw_ticks(raw: &str) -> Option<String> {
    let ticks: i64 = raw.trim().parse().ok()?;
    format_ticks(ticks)
}

// =============================================================================
// Tests
// =============================================================================
