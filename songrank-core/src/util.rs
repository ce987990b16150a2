use std::time::Duration;

/// Formats a playback time in seconds as `m:ss`.
///
/// Minutes are not capped at 60 and fractional seconds are truncated, so
/// `65.9` is `"1:05"` and an hour is `"60:00"`. Anything that isn't a
/// non-negative number formats as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// [`format_time`] for a [`Duration`].
pub fn format_duration(duration: Duration) -> String {
    format_time(duration.as_secs_f64())
}
