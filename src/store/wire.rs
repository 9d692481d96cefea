//! Row shapes of the remote tables and their mapping to the domain types.
//!
//! Remote columns are snake_case (`total_hours`, `client_id`, ...), the local
//! cache uses the camelCase serde names of the models.

use crate::models::{CalendarEvent, Client, EventType, Session};
use crate::store::remote::RemoteError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub sessions: Option<Vec<Session>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            total_hours: row.total_hours.unwrap_or(0.0),
            sessions: row.sessions.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        ClientRow {
            id: c.id.clone(),
            name: c.name.clone(),
            total_hours: Some(c.total_hours),
            sessions: Some(c.sessions.clone()),
            created_at: c.created_at.clone(),
            updated_at: c.updated_at.clone(),
        }
    }
}

impl From<EventRow> for CalendarEvent {
    fn from(row: EventRow) -> Self {
        let kind = row
            .kind
            .as_deref()
            .and_then(EventType::parse)
            .unwrap_or(EventType::Other);

        CalendarEvent {
            id: row.id,
            date: row.date,
            client_id: row.client_id,
            client_name: row.client_name,
            hours: row.hours.unwrap_or(0.0),
            description: row.description.unwrap_or_default(),
            start_time: row.start_time,
            end_time: row.end_time,
            kind,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&CalendarEvent> for EventRow {
    fn from(e: &CalendarEvent) -> Self {
        EventRow {
            id: e.id.clone(),
            date: e.date.clone(),
            client_id: e.client_id.clone(),
            client_name: e.client_name.clone(),
            hours: Some(e.hours),
            description: Some(e.description.clone()),
            start_time: e.start_time.clone(),
            end_time: e.end_time.clone(),
            kind: Some(e.kind.as_str().to_string()),
            created_at: e.created_at.clone(),
            updated_at: e.updated_at.clone(),
        }
    }
}

/// Decode a batch of remote rows into domain values.
///
/// A row that does not fit the schema fails the whole batch, the same way a
/// failed select would.
pub fn decode_rows<R, T>(rows: Vec<Value>) -> Result<Vec<T>, RemoteError>
where
    R: for<'de> Deserialize<'de>,
    T: From<R>,
{
    rows.into_iter()
        .map(|v| {
            serde_json::from_value::<R>(v)
                .map(T::from)
                .map_err(|e| RemoteError::Decode(e.to_string()))
        })
        .collect()
}

pub fn client_to_row(c: &Client) -> Result<Value, RemoteError> {
    serde_json::to_value(ClientRow::from(c)).map_err(|e| RemoteError::Decode(e.to_string()))
}

pub fn event_to_row(e: &CalendarEvent) -> Result<Value, RemoteError> {
    serde_json::to_value(EventRow::from(e)).map_err(|e| RemoteError::Decode(e.to_string()))
}
