use super::event_type::EventType;
use serde::{Deserialize, Serialize};

/// A scheduling entry shown on the calendar, optionally tied to a client.
///
/// `client_name` is copied from the client when the event is created and is
/// not kept in step with later renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub date: String, // YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>, // HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>, // HH:MM
    #[serde(rename = "type", default)]
    pub kind: EventType,
    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Everything a caller supplies when creating an event; id and timestamps
/// are filled in by the data layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub date: String,
    pub client_id: Option<String>,
    pub hours: f64,
    pub description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub kind: EventType,
}

impl CalendarEvent {
    pub fn from_draft(
        id: String,
        draft: EventDraft,
        client_name: Option<String>,
        now: String,
    ) -> Self {
        Self {
            id,
            date: draft.date,
            client_id: draft.client_id,
            client_name,
            hours: draft.hours,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
            kind: draft.kind,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }
}
