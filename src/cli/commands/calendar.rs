use crate::cli::commands::{finish, open_store};
use crate::config::Config;
use crate::core::calendar::{self, CalendarLayout, CalendarView, DayCell, MonthSummary, WeekStart};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;
use crate::utils::colors::{RESET, REVERSE, color_for_cell, color_for_event_type};
use crate::utils::date::{month_name, parse_date_arg, today, weekday_short};
use crate::utils::formatting::{hours_fixed, pad_right};
use chrono::{Datelike, NaiveDate};

const CELL_WIDTH: usize = 9;

pub fn handle(view: CalendarView, date: Option<&str>, shift: i32, cfg: &Config) -> AppResult<()> {
    let mut store = open_store(cfg)?;

    let reference = match date {
        Some(d) => parse_date_arg(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?,
        None => today(),
    };
    let reference = calendar::shift(reference, view, shift)?;

    match calendar::build(view, reference, store.events(), cfg.week_start) {
        CalendarLayout::Days(cells) => match view {
            CalendarView::Month => render_month(reference, &cells, cfg.week_start),
            _ => render_days(view, &cells),
        },
        CalendarLayout::Months(months) => render_year(reference.year(), &months),
    }

    finish(&mut store);
    Ok(())
}

fn render_month(reference: NaiveDate, cells: &[DayCell<'_>], week_start: WeekStart) {
    header(format!("{} {}", month_name(reference.month()), reference.year()));

    let names: Vec<String> = cells
        .iter()
        .take(7)
        .map(|c| pad_right(&weekday_short(c.date), CELL_WIDTH))
        .collect();
    println!("{}", names.join(" "));

    let now = today();
    for week in cells.chunks(7) {
        let mut days = Vec::with_capacity(7);
        let mut hours = Vec::with_capacity(7);

        for cell in week {
            let day = pad_right(&format!("{:>2}", cell.date.day()), CELL_WIDTH);
            let color = if cell.date == now {
                REVERSE
            } else {
                color_for_cell(cell.in_period)
            };
            days.push(format!("{}{}{}", color, day, RESET));

            let total = cell.total_hours();
            let text = if cell.events.is_empty() {
                String::new()
            } else {
                format!("{}h/{}", hours_fixed(total), cell.events.len())
            };
            hours.push(pad_right(&text, CELL_WIDTH));
        }

        println!("{}", days.join(" "));
        println!("{}", hours.join(" "));
    }

    let period: Vec<&DayCell<'_>> = cells.iter().filter(|c| c.in_period).collect();
    let total: f64 = period.iter().map(|c| c.total_hours()).sum();
    let count: usize = period.iter().map(|c| c.events.len()).sum();
    println!(
        "\n{} events, {}h (weeks start on {:?})",
        count,
        hours_fixed(total),
        week_start
    );
}

fn render_days(view: CalendarView, cells: &[DayCell<'_>]) {
    if let (Some(first), Some(last)) = (cells.first(), cells.last()) {
        if view == CalendarView::Day {
            header(first.date.format("%A %Y-%m-%d"));
        } else {
            header(format!("{} → {}", first.key(), last.key()));
        }
    }

    for cell in cells {
        println!(
            "{} {}  {}h",
            weekday_short(cell.date),
            cell.key(),
            hours_fixed(cell.total_hours())
        );
        for e in &cell.events {
            let time = e.start_time.as_deref().unwrap_or("     ");
            println!(
                "    {}{:<8}{} {} {:>6}h  {}{}",
                color_for_event_type(e.kind),
                e.kind.as_str(),
                RESET,
                time,
                hours_fixed(e.hours),
                e.client_name
                    .as_deref()
                    .map(|n| format!("[{}] ", n))
                    .unwrap_or_default(),
                e.description
            );
        }
    }
}

fn render_year(year: i32, months: &[MonthSummary]) {
    header(year);
    for m in months {
        println!(
            "{} {:>4} events {:>9}h",
            pad_right(month_name(m.month), 10),
            m.event_count,
            hours_fixed(m.total_hours)
        );
    }
    let total: f64 = months.iter().map(|m| m.total_hours).sum();
    println!("\nTotal: {}h", hours_fixed(total));
}
