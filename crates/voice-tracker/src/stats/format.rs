//! Human-readable durations

/// Render whole seconds as `"{h}h {m}m {s}s"`
///
/// Leading zero units are dropped; inner zeros are kept, so an hour and
/// five seconds reads `"1h 0m 5s"`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
