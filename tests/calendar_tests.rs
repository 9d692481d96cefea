use chrono::{Datelike, NaiveDate, Weekday};
use rtimeboard::core::calendar::{
    self, CalendarLayout, CalendarView, MONTH_GRID_CELLS, WeekStart, month_grid, week_days,
    year_summary,
};
use rtimeboard::errors::AppError;
use rtimeboard::models::{CalendarEvent, EventType};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn event(id: &str, date: &str, hours: f64) -> CalendarEvent {
    CalendarEvent {
        id: id.into(),
        date: date.into(),
        client_id: None,
        client_name: None,
        hours,
        description: String::new(),
        start_time: None,
        end_time: None,
        kind: EventType::Task,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn week_starts_on_configured_day() {
    // 2025-06-11 is a Wednesday
    let sunday = week_days(d(2025, 6, 11), WeekStart::Sunday);
    assert_eq!(sunday.len(), 7);
    assert_eq!(sunday[0], d(2025, 6, 8));
    assert_eq!(sunday[0].weekday(), Weekday::Sun);

    let monday = week_days(d(2025, 6, 11), WeekStart::Monday);
    assert_eq!(monday[0], d(2025, 6, 9));
    assert_eq!(monday[6], d(2025, 6, 15));
}

#[test]
fn month_grid_has_42_cells_from_week_start() {
    // June 2025 starts on a Sunday
    let grid = month_grid(d(2025, 6, 20), WeekStart::Sunday);
    assert_eq!(grid.len(), MONTH_GRID_CELLS);
    assert_eq!(grid[0], d(2025, 6, 1));

    let grid = month_grid(d(2025, 6, 20), WeekStart::Monday);
    assert_eq!(grid[0], d(2025, 5, 26));
    assert_eq!(grid[41], d(2025, 7, 6));
}

#[test]
fn month_view_flags_days_outside_the_month() {
    let events = vec![event("a", "2025-05-31", 1.0), event("b", "2025-06-02", 2.0)];

    let CalendarLayout::Days(cells) =
        calendar::build(CalendarView::Month, d(2025, 6, 15), &events, WeekStart::Monday)
    else {
        panic!("month view must produce day cells");
    };

    assert_eq!(cells.len(), 42);
    let may31 = cells.iter().find(|c| c.date == d(2025, 5, 31)).expect("May 31 in grid");
    assert!(!may31.in_period);
    assert_eq!(may31.events.len(), 1);

    let june2 = cells.iter().find(|c| c.date == d(2025, 6, 2)).expect("June 2 in grid");
    assert!(june2.in_period);
    assert_eq!(june2.total_hours(), 2.0);
}

#[test]
fn day_and_week_views() {
    let events = vec![
        event("a", "2025-06-11", 1.5),
        event("b", "2025-06-11", 0.5),
        event("c", "2025-06-14", 3.0),
        event("d", "2025-06-16", 9.0),
    ];

    let CalendarLayout::Days(day) =
        calendar::build(CalendarView::Day, d(2025, 6, 11), &events, WeekStart::Sunday)
    else {
        panic!("day view");
    };
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].total_hours(), 2.0);

    let CalendarLayout::Days(week) =
        calendar::build(CalendarView::Week, d(2025, 6, 11), &events, WeekStart::Sunday)
    else {
        panic!("week view");
    };
    let total: f64 = week.iter().map(|c| c.total_hours()).sum();
    assert_eq!(total, 5.0);
    assert!(week.iter().all(|c| c.in_period));
}

#[test]
fn events_match_exact_date_only() {
    let events = vec![event("a", "2025-06-11T10:00", 1.0), event("b", "2025-6-11", 1.0)];
    let CalendarLayout::Days(day) =
        calendar::build(CalendarView::Day, d(2025, 6, 11), &events, WeekStart::Sunday)
    else {
        panic!("day view");
    };
    assert!(day[0].events.is_empty());
}

#[test]
fn year_summary_groups_by_month_prefix() {
    let events = vec![
        event("a", "2025-01-05", 1.0),
        event("b", "2025-01-20", 2.0),
        event("c", "2025-12-31", 4.0),
        event("d", "2024-12-31", 8.0),
    ];

    let months = year_summary(d(2025, 3, 1), &events);
    assert_eq!(months.len(), 12);
    assert_eq!(months[0].event_count, 2);
    assert_eq!(months[0].total_hours, 3.0);
    assert_eq!(months[1].event_count, 0);
    assert_eq!(months[11].total_hours, 4.0);
}

#[test]
fn shift_moves_by_view() {
    let shift = |date, view, steps| calendar::shift(date, view, steps).expect("in range");
    assert_eq!(shift(d(2025, 6, 11), CalendarView::Day, -1), d(2025, 6, 10));
    assert_eq!(shift(d(2025, 6, 11), CalendarView::Week, 2), d(2025, 6, 25));
    assert_eq!(shift(d(2025, 1, 31), CalendarView::Month, 1), d(2025, 2, 28));
    assert_eq!(shift(d(2024, 2, 29), CalendarView::Year, 1), d(2025, 2, 28));
    assert_eq!(shift(d(2025, 3, 15), CalendarView::Month, -3), d(2024, 12, 15));
    assert_eq!(shift(d(2025, 3, 15), CalendarView::Year, 0), d(2025, 3, 15));
}

#[test]
fn shift_out_of_range_is_an_error() {
    let today = d(2025, 6, 11);
    for view in [CalendarView::Day, CalendarView::Week, CalendarView::Month, CalendarView::Year] {
        assert!(
            matches!(calendar::shift(today, view, i32::MAX), Err(AppError::InvalidDate(_))),
            "{view:?} forward"
        );
        assert!(
            matches!(calendar::shift(today, view, i32::MIN), Err(AppError::InvalidDate(_))),
            "{view:?} backward"
        );
    }

    assert!(calendar::shift(NaiveDate::MAX, CalendarView::Day, 0).is_err());
    assert!(calendar::shift(NaiveDate::MIN, CalendarView::Month, 0).is_err());
}

#[test]
fn october_2025_grid_starts_mid_week() {
    // 2025-10-01 is a Wednesday
    let sunday = month_grid(d(2025, 10, 15), WeekStart::Sunday);
    assert_eq!(sunday.len(), MONTH_GRID_CELLS);
    assert_eq!(sunday[0], d(2025, 9, 28));
    assert_eq!(sunday[3], d(2025, 10, 1));
    assert_eq!(sunday[33], d(2025, 10, 31));
    assert_eq!(sunday[41], d(2025, 11, 8));

    let monday = month_grid(d(2025, 10, 1), WeekStart::Monday);
    assert_eq!(monday.len(), MONTH_GRID_CELLS);
    assert_eq!(monday[0], d(2025, 9, 29));
    assert_eq!(monday[2], d(2025, 10, 1));
    assert_eq!(monday[41], d(2025, 11, 9));

    let events = vec![event("a", "2025-10-01", 2.0), event("b", "2025-09-30", 1.0)];
    let CalendarLayout::Days(cells) =
        calendar::build(CalendarView::Month, d(2025, 10, 1), &events, WeekStart::Sunday)
    else {
        panic!("month view must produce day cells");
    };
    assert!(!cells[2].in_period);
    assert_eq!(cells[2].events.len(), 1);
    assert!(cells[3].in_period);
    assert_eq!(cells[3].total_hours(), 2.0);
}
