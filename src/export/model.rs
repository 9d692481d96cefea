// src/export/model.rs

use crate::models::{CalendarEvent, Client};
use crate::utils::formatting::hours_to_minutes;
use serde::Serialize;

/// Flat row for session exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub client_id: String,
    pub client_name: String,
    pub date: String,
    pub hours: f64,
    pub minutes: i64,
    pub description: String,
}

/// Flat row for calendar event exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EventExport {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub client_id: String,
    pub client_name: String,
    pub hours: f64,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
}

pub(crate) fn sessions_of(client: &Client) -> impl Iterator<Item = SessionExport> + '_ {
    client.sessions.iter().map(move |s| SessionExport {
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        date: s.date.clone(),
        hours: s.hours,
        minutes: hours_to_minutes(s.hours),
        description: s.description.clone(),
    })
}

impl From<&CalendarEvent> for EventExport {
    fn from(e: &CalendarEvent) -> Self {
        EventExport {
            id: e.id.clone(),
            date: e.date.clone(),
            kind: e.kind.as_str().to_string(),
            client_id: e.client_id.clone().unwrap_or_default(),
            client_name: e.client_name.clone().unwrap_or_default(),
            hours: e.hours,
            start_time: e.start_time.clone().unwrap_or_default(),
            end_time: e.end_time.clone().unwrap_or_default(),
            description: e.description.clone(),
        }
    }
}
