//! Elapsed-time formatting

/// Format a duration of elapsed seconds as `{days}d {hh}h {mm}m {ss}s`.
///
/// Plain integer decomposition of the whole-second total; fractional
/// seconds are truncated. This is a duration, not a calendar timestamp,
/// so there is no month/year wrap-around.
pub fn format_elapsed(total_seconds: f64) -> String {
    let total = if total_seconds > 0.0 {
        total_seconds as u64
    } else {
        0
    };

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
}
