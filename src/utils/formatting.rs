//! Formatting utilities used for CLI and export outputs.

pub fn pad_right(s: &str, width: usize) -> String {
    let w = unicode_width::UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

/// Fractional hours rounded to whole minutes.
pub fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// `2.5` → `"02h 30m"`.
pub fn hours2readable(hours: f64) -> String {
    let mins = hours_to_minutes(hours);
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}h {:02}m", sign, m / 60, m % 60)
}

/// Two decimals, as shown next to every amount of hours.
pub fn hours_fixed(hours: f64) -> String {
    format!("{:.2}", hours)
}
