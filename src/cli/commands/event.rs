use crate::cli::commands::{finish, open_store, resolve_client};
use crate::cli::parser::EventAction;
use crate::config::Config;
use crate::core::DataStore;
use crate::errors::{AppError, AppResult};
use crate::models::{CalendarEvent, EventDraft};
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_event_type};
use crate::utils::date::parse_date_arg;
use crate::utils::formatting::hours_fixed;
use crate::utils::table::{Column, Table};
use crate::utils::time::parse_optional_time;

fn date_arg(s: &str) -> AppResult<String> {
    parse_date_arg(s)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub fn handle(action: &EventAction, cfg: &Config) -> AppResult<()> {
    let mut store = open_store(cfg)?;

    match action {
        EventAction::Add {
            date,
            hours,
            description,
            client,
            start_time,
            end_time,
            kind,
        } => {
            let client_id = client
                .as_deref()
                .map(|c| resolve_client(&store, c))
                .transpose()?;

            let event = store.add_calendar_event(EventDraft {
                date: date_arg(date)?,
                client_id,
                hours: *hours,
                description: description.trim().to_string(),
                start_time: parse_optional_time(start_time.as_ref())?,
                end_time: parse_optional_time(end_time.as_ref())?,
                kind: *kind,
            })?;
            success(format!("Event {} added on {} (id {})", event.kind, event.date, event.id));
        }
        EventAction::Edit {
            id,
            date,
            hours,
            description,
            client,
            start_time,
            end_time,
            kind,
        } => {
            let current = store
                .events()
                .iter()
                .find(|e| e.id == *id)
                .cloned()
                .ok_or_else(|| AppError::EventNotFound(id.clone()))?;

            let (client_id, client_name) = match client {
                Some(key) => {
                    let cid = resolve_client(&store, key)?;
                    let name = store.client(&cid).map(|c| c.name.clone());
                    (Some(cid), name)
                }
                None => (current.client_id.clone(), current.client_name.clone()),
            };

            let edited = CalendarEvent {
                date: match date {
                    Some(d) => date_arg(d)?,
                    None => current.date.clone(),
                },
                hours: hours.unwrap_or(current.hours),
                description: description
                    .as_deref()
                    .map(|d| d.trim().to_string())
                    .unwrap_or_else(|| current.description.clone()),
                client_id,
                client_name,
                start_time: match start_time {
                    Some(_) => parse_optional_time(start_time.as_ref())?,
                    None => current.start_time.clone(),
                },
                end_time: match end_time {
                    Some(_) => parse_optional_time(end_time.as_ref())?,
                    None => current.end_time.clone(),
                },
                kind: kind.unwrap_or(current.kind),
                ..current
            };

            let updated = store.update_calendar_event(edited)?;
            success(format!("Event {} updated", updated.id));
        }
        EventAction::Del { id } => {
            let removed = store.delete_calendar_event(id)?;
            success(format!("Event {} on {} deleted", removed.id, removed.date));
        }
        EventAction::List { date, client } => {
            let mut events: Vec<&CalendarEvent> = match (date, client) {
                (Some(d), _) => store.events_for_date(&date_arg(d)?),
                (None, Some(c)) => store.events_for_client(&resolve_client(&store, c)?),
                (None, None) => store.events().iter().collect(),
            };
            if let (Some(_), Some(c)) = (date, client) {
                let cid = resolve_client(&store, c)?;
                events.retain(|e| e.client_id.as_deref() == Some(cid.as_str()));
            }
            print_events(&store, events);
        }
    }

    finish(&mut store);
    Ok(())
}

fn print_events(store: &DataStore, mut events: Vec<&CalendarEvent>) {
    if events.is_empty() {
        info("No calendar events found.");
        return;
    }
    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });

    let mut table = Table::new(vec![
        Column::new("ID"),
        Column::new("Date"),
        Column::new("Type"),
        Column::new("Client"),
        Column::new("Hours"),
        Column::new("Time"),
        Column::new("Description"),
    ]);

    for e in &events {
        // Denormalised name first; fall back to the live client record.
        let client = e
            .client_name
            .clone()
            .or_else(|| {
                e.client_id
                    .as_deref()
                    .and_then(|id| store.client(id))
                    .map(|c| c.name.clone())
            })
            .unwrap_or_else(|| "-".into());
        let time = match (&e.start_time, &e.end_time) {
            (Some(s), Some(t)) => format!("{}-{}", s, t),
            (Some(s), None) => s.clone(),
            (None, Some(t)) => format!("-{}", t),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            e.id.clone(),
            e.date.clone(),
            e.kind.to_string(),
            client,
            hours_fixed(e.hours),
            time,
            e.description.clone(),
        ]);
    }
    print!("{}", table.render());

    let total: f64 = events.iter().map(|e| e.hours).sum();
    let legend: Vec<String> = events
        .iter()
        .map(|e| e.kind)
        .fold(Vec::new(), |mut acc, k| {
            if !acc.contains(&k) {
                acc.push(k);
            }
            acc
        })
        .into_iter()
        .map(|k| format!("{}■{} {}", color_for_event_type(k), RESET, k))
        .collect();
    println!("\n{} events, {}h   {}", events.len(), hours_fixed(total), legend.join("  "));
}
