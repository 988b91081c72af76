//! Backend representations of instants and durations.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Formats an instant the way the ingestion endpoint expects timestamps:
/// ISO-8601 UTC with seven fractional digits (100 ns ticks).
pub(crate) fn format_time(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    let ticks = time.timestamp_subsec_nanos() / 100;
    format!("{}.{ticks:07}Z", time.format("%Y-%m-%dT%H:%M:%S"))
}

/// Formats an elapsed time as `DD.HH:MM:SS.ffffff`.
///
/// Sub-microsecond precision is dropped; the backend does not accept more
/// than six fractional digits.
pub(crate) fn format_duration_nanos(nanos: u64) -> String {
    let micros = (nanos % NANOS_PER_SECOND) / 1_000;
    let total_seconds = nanos / NANOS_PER_SECOND;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = (total_seconds / 3_600) % 24;
    let days = total_seconds / 86_400;
    format!("{days:02}.{hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
}

/// Elapsed nanoseconds between two instants, zero when the clock went
/// backwards.
pub(crate) fn elapsed_nanos(start: SystemTime, end: SystemTime) -> u64 {
    end.duration_since(start)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_nanos() as u64
}

/// Milliseconds since the Unix epoch, zero for instants before it.
pub(crate) fn epoch_millis(time: SystemTime) -> i64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_millis() as i64
}
