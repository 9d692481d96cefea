pub mod calendar_event;
pub mod client;
pub mod event_type;

pub use calendar_event::{CalendarEvent, EventDraft};
pub use client::{Client, Session};
pub use event_type::EventType;

use chrono::Utc;

/// New random identifier for clients, sessions and events.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current instant as RFC 3339 (the format stored in `created_at` / `updated_at`).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
