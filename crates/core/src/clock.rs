// Clock label formatting

/// Label shown while the duration is unknown
pub const UNKNOWN_CLOCK: &str = "--:--";

/// Format seconds as `M:SS`, minutes unpadded
///
/// Non-finite or negative input renders as `0:00` rather than passing raw
/// values through to a label.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}
