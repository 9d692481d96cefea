//! Calendar bucketing: which cells to render for a view, and which events
//! fall in each.
//!
//! Events are matched to a day by exact equality of their `YYYY-MM-DD`
//! date string; nothing is normalised across time zones.

use crate::errors::{AppError, AppResult};
use crate::models::CalendarEvent;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column of `date` in a week starting on `self` (0..=6).
    pub fn offset(&self, date: NaiveDate) -> u32 {
        match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        }
    }
}

/// Cells of the month grid: 6 weeks.
pub const MONTH_GRID_CELLS: usize = 42;

#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for leading/trailing days of a month grid outside the month.
    pub in_period: bool,
    pub events: Vec<&'a CalendarEvent>,
}

impl DayCell<'_> {
    pub fn key(&self) -> String {
        date_key(self.date)
    }

    pub fn total_hours(&self) -> f64 {
        self.events.iter().map(|e| e.hours).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub event_count: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone)]
pub enum CalendarLayout<'a> {
    Days(Vec<DayCell<'a>>),
    Months(Vec<MonthSummary>),
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Events on exactly `date`.
pub fn events_on<'a>(events: &'a [CalendarEvent], date: NaiveDate) -> Vec<&'a CalendarEvent> {
    let key = date_key(date);
    events.iter().filter(|e| e.date == key).collect()
}

/// First day of the week containing `date`.
pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    date - Duration::days(week_start.offset(date) as i64)
}

/// The seven days of the week containing `date`.
pub fn week_days(date: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let first = week_start_of(date, week_start);
    (0..7).map(|i| first + Duration::days(i)).collect()
}

/// Fixed 42-day grid for the month containing `date`, starting on the week
/// start on or before the 1st.
pub fn month_grid(date: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let first_of_month = date.with_day(1).unwrap_or(date);
    let first = week_start_of(first_of_month, week_start);
    (0..MONTH_GRID_CELLS as i64)
        .map(|i| first + Duration::days(i))
        .collect()
}

fn day_cells<'a>(
    days: Vec<NaiveDate>,
    events: &'a [CalendarEvent],
    in_period: impl Fn(NaiveDate) -> bool,
) -> Vec<DayCell<'a>> {
    days.into_iter()
        .map(|d| DayCell {
            date: d,
            in_period: in_period(d),
            events: events_on(events, d),
        })
        .collect()
}

/// Per-month totals for the year of `date`, matched on the `YYYY-MM` prefix.
pub fn year_summary(date: NaiveDate, events: &[CalendarEvent]) -> Vec<MonthSummary> {
    let year = date.year();
    (1..=12)
        .map(|month| {
            let prefix = format!("{:04}-{:02}-", year, month);
            let matching: Vec<&CalendarEvent> =
                events.iter().filter(|e| e.date.starts_with(&prefix)).collect();
            MonthSummary {
                year,
                month,
                event_count: matching.len(),
                total_hours: matching.iter().map(|e| e.hours).sum(),
            }
        })
        .collect()
}

/// Cells for `view` around `reference`.
pub fn build<'a>(
    view: CalendarView,
    reference: NaiveDate,
    events: &'a [CalendarEvent],
    week_start: WeekStart,
) -> CalendarLayout<'a> {
    match view {
        CalendarView::Day => CalendarLayout::Days(day_cells(vec![reference], events, |_| true)),
        CalendarView::Week => {
            CalendarLayout::Days(day_cells(week_days(reference, week_start), events, |_| true))
        }
        CalendarView::Month => {
            let (year, month) = (reference.year(), reference.month());
            CalendarLayout::Days(day_cells(
                month_grid(reference, week_start),
                events,
                move |d| d.year() == year && d.month() == month,
            ))
        }
        CalendarView::Year => CalendarLayout::Months(year_summary(reference, events)),
    }
}

/// Move `steps` views forward (negative: backward). Month and year steps
/// clamp the day to the end of a shorter month. A result too close to the
/// ends of the supported date range to lay out is an `InvalidDate` error.
pub fn shift(reference: NaiveDate, view: CalendarView, steps: i32) -> AppResult<NaiveDate> {
    let by_days = |n: i64| {
        Duration::try_days(n).and_then(|delta| reference.checked_add_signed(delta))
    };
    let by_months = |n: i32| {
        let m = Months::new(n.unsigned_abs());
        if n >= 0 {
            reference.checked_add_months(m)
        } else {
            reference.checked_sub_months(m)
        }
    };

    let shifted = match view {
        CalendarView::Day => by_days(i64::from(steps)),
        CalendarView::Week => by_days(7 * i64::from(steps)),
        CalendarView::Month => by_months(steps),
        CalendarView::Year => steps.checked_mul(12).and_then(by_months),
    };

    // every layout reaches at most six weeks around the reference
    let margin = Duration::days(MONTH_GRID_CELLS as i64);
    let renderable = |d: &NaiveDate| {
        d.checked_sub_signed(margin).is_some() && d.checked_add_signed(margin).is_some()
    };

    shifted.filter(renderable).ok_or_else(|| {
        AppError::InvalidDate(format!("{} shifted by {} {:?} view(s)", reference, steps, view))
    })
}
