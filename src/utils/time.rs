//! Time utilities: parsing HH:MM, formatting stopwatch and hour values.

use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Normalise an optional `HH:MM` argument (e.g. "9:05" → "09:05").
pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<String>> {
    match input {
        Some(s) => {
            let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
            Ok(Some(t.format("%H:%M").to_string()))
        }
        None => Ok(None),
    }
}

/// Stopwatch display: `HH:MM:SS`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Confirmation display after a save: `H:MM:SS`.
pub fn format_hms_short(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}
