// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Months, NaiveDate};

fn bad(msg: &str) -> AppError {
    AppError::InvalidDate(msg.to_string())
}

/// First and last day covered by a single period token.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| bad(p))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad(p))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad(p))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let d1 = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| bad(p))?;
            let d2 = d1
                .checked_add_months(Months::new(1))
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| bad(p))?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| bad(p))?;
            Ok((d, d))
        }
        _ => Err(bad(p)),
    }
}

/// Parse --range (year / month / day / interval).
///
/// Supports `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and `start:end` pairs of the
/// same shape.
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let (start, end) = (start_raw.trim(), end_raw.trim());
        if start.len() != end.len() {
            return Err(bad("start and end must have the same format"));
        }
        let (d1, _) = period_bounds(start)?;
        let (_, d2) = period_bounds(end)?;
        if d1 > d2 {
            return Err(bad(r));
        }
        Ok((d1, d2))
    } else {
        period_bounds(r.trim())
    }
}

/// Inclusive check on an ISO date string; unparseable dates never match.
pub(crate) fn in_range(date: &str, bounds: Option<(NaiveDate, NaiveDate)>) -> bool {
    match bounds {
        None => true,
        Some((from, to)) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d >= from && d <= to)
            .unwrap_or(false),
    }
}
