//! Data layer: the authoritative in-memory collections plus their two
//! replicas.
//!
//! Every mutation follows the same contract:
//! 1. build the next collection from the current one,
//! 2. swap it in (visible immediately through the getters),
//! 3. write the whole collection to the local cache, then queue one remote
//!    write per changed row.
//!
//! Neither replica can undo steps 1-2. Local write failures and remote
//! failures end up as [`Notice`]s for the caller to show.

use crate::core::stopwatch::SessionSink;
use crate::errors::{AppError, AppResult};
use crate::models::{CalendarEvent, Client, EventDraft, Session, new_id, now_rfc3339};
use crate::store::local::{CLIENTS_KEY, EVENTS_KEY};
use crate::store::remote::{RemoteError, RemoteStore, Table};
use crate::store::sync::{RemoteOp, RemoteSync};
use crate::store::wire::{self, ClientRow, EventRow};
use crate::store::{LocalCache, merge};
use crate::utils::date;
use crate::utils::time::parse_time;
use serde_json::Value;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Something the user should be told about, produced as a side effect of a
/// load or a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Hours must be a positive, finite number.
pub fn validate_hours(hours: f64) -> AppResult<f64> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(AppError::Validation(format!(
            "hours must be a positive number (got {})",
            hours
        )));
    }
    Ok(hours)
}

/// Checks an event and returns its date as `YYYY-MM-DD`.
fn validate_event(
    date_str: &str,
    hours: f64,
    description: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<String> {
    let date = date::parse_date(date_str).ok_or_else(|| AppError::InvalidDate(date_str.to_string()))?;

    validate_hours(hours)?;
    if description.trim().is_empty() {
        return Err(AppError::Validation("event description cannot be empty".into()));
    }

    for t in [start, end].into_iter().flatten() {
        parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))?;
    }
    Ok(date.format("%Y-%m-%d").to_string())
}

pub struct DataStore {
    local: LocalCache,
    remote: Option<RemoteSync>,
    clients: Vec<Client>,
    events: Vec<CalendarEvent>,
    notices: Vec<Notice>,
}

impl DataStore {
    /// Empty store; call [`DataStore::load_clients`] to populate it.
    pub fn new(local: LocalCache, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        Self {
            local,
            remote: remote.map(RemoteSync::new),
            clients: Vec::new(),
            events: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Store populated through the full load path.
    pub fn open(local: LocalCache, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        let mut store = Self::new(local, remote);
        store.load_clients();
        store
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut LocalCache {
        &mut self.local
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Look a client up by id, then by case-insensitive name.
    pub fn find_client(&self, key: &str) -> Option<&Client> {
        let key = key.trim();
        self.client(key).or_else(|| {
            self.clients
                .iter()
                .find(|c| c.name.trim().eq_ignore_ascii_case(key))
        })
    }

    pub fn events_for_client(&self, client_id: &str) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| e.client_id.as_deref() == Some(client_id))
            .collect()
    }

    pub fn events_for_date(&self, date: &str) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// Drain the notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ------------------------------------------------------------------
    // Load path
    // ------------------------------------------------------------------

    /// Local snapshot first, then the remote tables merged over it.
    pub fn load_clients(&mut self) {
        self.load_local();
        self.load_remote();
    }

    /// Same as [`DataStore::load_clients`], with a confirmation notice.
    pub fn refresh(&mut self) {
        self.load_clients();
        self.notices
            .push(Notice::info("Data reloaded from the local cache and the remote store"));
    }

    pub fn load_local(&mut self) {
        self.clients = self.read_local(CLIENTS_KEY, "clients");
        self.events = self.read_local(EVENTS_KEY, "calendar events");
        log::info!(
            "loaded {} clients and {} events from the local cache",
            self.clients.len(),
            self.events.len()
        );
    }

    fn read_local<T: serde::de::DeserializeOwned>(&mut self, key: &str, what: &str) -> Vec<T> {
        match self.local.get::<Vec<T>>(key) {
            Ok(v) => v.unwrap_or_default(),
            Err(e) => {
                log::error!("cannot read {} from the local cache: {}", what, e);
                self.notices
                    .push(Notice::error(format!("Could not read local {}: {}", what, e)));
                Vec::new()
            }
        }
    }

    /// Read both remote tables on independent threads and merge each one as
    /// soon as its result arrives.
    pub fn load_remote(&mut self) {
        let Some(remote) = &self.remote else {
            return;
        };
        let store = remote.store();

        let (tx, rx) = mpsc::channel::<(Table, Result<Vec<Value>, RemoteError>)>();

        thread::scope(|scope| {
            for table in [Table::Clients, Table::CalendarEvents] {
                let tx = tx.clone();
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    let result = store.select(table, &table.default_order());
                    let _ = tx.send((table, result));
                });
            }
            drop(tx);

            for (table, result) in rx {
                match table {
                    Table::Clients => self.apply_remote_clients(result),
                    Table::CalendarEvents => self.apply_remote_events(result),
                }
            }
        });
    }

    fn apply_remote_clients(&mut self, result: Result<Vec<Value>, RemoteError>) {
        let remote = result.and_then(wire::decode_rows::<ClientRow, Client>);
        match remote {
            Err(e) => {
                log::error!("loading clients from the remote store failed: {}", e);
                if e.is_missing_table() {
                    self.notices.push(Notice::warning(
                        "Remote tables do not exist: create the 'clients' and 'calendar_events' tables on the remote store",
                    ));
                } else {
                    self.notices.push(Notice::warning(
                        "Could not load clients from the remote store, using local data",
                    ));
                }
            }
            Ok(rows) if rows.is_empty() => {}
            Ok(rows) => {
                self.clients = merge(&self.clients, &rows);
                self.write_local(CLIENTS_KEY, "clients");
                log::info!("merged {} remote clients", rows.len());
            }
        }
    }

    fn apply_remote_events(&mut self, result: Result<Vec<Value>, RemoteError>) {
        let remote = result.and_then(wire::decode_rows::<EventRow, CalendarEvent>);
        match remote {
            Err(e) if e.is_missing_table() => {
                log::info!("calendar_events table does not exist yet; skipping");
            }
            Err(e) => {
                log::error!("loading calendar events from the remote store failed: {}", e);
                self.notices.push(Notice::warning(
                    "Could not load calendar events from the remote store, using local data",
                ));
            }
            Ok(rows) if rows.is_empty() => {}
            Ok(rows) => {
                self.events = merge(&self.events, &rows);
                self.write_local(EVENTS_KEY, "calendar events");
                log::info!("merged {} remote calendar events", rows.len());
            }
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn write_local(&mut self, key: &str, what: &str) {
        let result = if key == CLIENTS_KEY {
            self.local.set(key, &self.clients)
        } else {
            self.local.set(key, &self.events)
        };

        if let Err(e) = result {
            log::error!("cannot write {} to the local cache: {}", what, e);
            self.notices
                .push(Notice::error(format!("Could not save {} locally: {}", what, e)));
        }
    }

    fn push_clients(&mut self, changed: &[&str]) {
        self.write_local(CLIENTS_KEY, "clients");

        let Some(remote) = &self.remote else {
            return;
        };
        for id in changed {
            let Some(client) = self.clients.iter().find(|c| c.id == *id) else {
                continue;
            };
            match wire::client_to_row(client) {
                Ok(row) => remote.submit(RemoteOp::Upsert {
                    table: Table::Clients,
                    id: client.id.clone(),
                    row,
                }),
                Err(e) => log::warn!("cannot encode client '{}': {}", client.id, e),
            }
        }
    }

    fn push_events(&mut self, changed: &[&str]) {
        self.write_local(EVENTS_KEY, "calendar events");

        let Some(remote) = &self.remote else {
            return;
        };
        for id in changed {
            let Some(event) = self.events.iter().find(|e| e.id == *id) else {
                continue;
            };
            match wire::event_to_row(event) {
                Ok(row) => remote.submit(RemoteOp::Upsert {
                    table: Table::CalendarEvents,
                    id: event.id.clone(),
                    row,
                }),
                Err(e) => log::warn!("cannot encode event '{}': {}", event.id, e),
            }
        }
    }

    fn push_delete(&self, table: Table, id: &str) {
        if let Some(remote) = &self.remote {
            remote.submit(RemoteOp::Delete {
                table,
                id: id.to_string(),
            });
        }
    }

    /// Wait for queued remote writes; failures become warning notices.
    pub fn flush_remote(&mut self) {
        let Some(remote) = &self.remote else {
            return;
        };
        let failures = remote.flush();
        if !failures.is_empty() {
            for f in &failures {
                log::warn!("{} failed: {}", f.op, f.error);
            }
            self.notices.push(Notice::warning(format!(
                "Saved locally, but {} change(s) did not reach the remote store (first: {} → {})",
                failures.len(),
                failures[0].op,
                failures[0].error
            )));
        }
    }

    /// Replace the client `id` with the result of `update`.
    fn replace_client<F>(&mut self, id: &str, update: F) -> AppResult<Client>
    where
        F: FnOnce(&Client) -> AppResult<Client>,
    {
        let current = self
            .client(id)
            .ok_or_else(|| AppError::ClientNotFound(id.to_string()))?;
        let updated = update(current)?;

        let next: Vec<Client> = self
            .clients
            .iter()
            .map(|c| if c.id == id { updated.clone() } else { c.clone() })
            .collect();
        self.clients = next;
        self.push_clients(&[id]);

        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------

    pub fn add_client(&mut self, name: &str) -> AppResult<Client> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("client name cannot be empty".into()));
        }

        let client = Client::new(new_id(), name.to_string(), now_rfc3339());
        log::debug!("adding client {} ({})", client.name, client.id);

        let mut next = self.clients.clone();
        next.push(client.clone());
        self.clients = next;
        self.push_clients(&[client.id.as_str()]);

        self.local.audit("add_client", &client.id, &client.name);
        Ok(client)
    }

    pub fn rename_client(&mut self, id: &str, name: &str) -> AppResult<Client> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("client name cannot be empty".into()));
        }

        let updated = self.replace_client(id, |c| {
            Ok(Client {
                name,
                updated_at: Some(now_rfc3339()),
                ..c.clone()
            })
        })?;

        self.local.audit("rename_client", id, &updated.name);
        Ok(updated)
    }

    /// Calendar events pointing at the client are left in place.
    pub fn delete_client(&mut self, id: &str) -> AppResult<Client> {
        let removed = self
            .client(id)
            .cloned()
            .ok_or_else(|| AppError::ClientNotFound(id.to_string()))?;
        log::debug!("deleting client {}", id);

        let next: Vec<Client> = self.clients.iter().filter(|c| c.id != id).cloned().collect();
        self.clients = next;
        self.push_clients(&[]);
        self.push_delete(Table::Clients, id);

        self.local.audit("delete_client", id, &removed.name);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    pub fn add_time_session(
        &mut self,
        client_id: &str,
        hours: f64,
        description: &str,
    ) -> AppResult<Session> {
        let hours = validate_hours(hours)?;
        let session = Session {
            id: new_id(),
            date: date::today().format("%Y-%m-%d").to_string(),
            hours,
            description: description.trim().to_string(),
        };
        log::debug!("adding {:.4}h to client {}", hours, client_id);

        let new_session = session.clone();
        self.replace_client(client_id, move |c| {
            let mut sessions = Vec::with_capacity(c.sessions.len() + 1);
            sessions.push(new_session);
            sessions.extend(c.sessions.iter().cloned());
            Ok(Client {
                total_hours: c.total_hours + hours,
                sessions,
                updated_at: Some(now_rfc3339()),
                ..c.clone()
            })
        })?;

        self.local
            .audit("add_session", client_id, &format!("{:.4}h {}", hours, session.description));
        Ok(session)
    }

    /// `position` is 1-based, newest first. A `None` description keeps the
    /// current one.
    pub fn edit_session(
        &mut self,
        client_id: &str,
        position: usize,
        hours: f64,
        description: Option<&str>,
    ) -> AppResult<Session> {
        let hours = validate_hours(hours)?;

        let updated = self.replace_client(client_id, |c| {
            let idx = c
                .session_index(position)
                .ok_or(AppError::InvalidSession(position))?;
            let delta = hours - c.sessions[idx].hours;

            let sessions = c
                .sessions
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    if i == idx {
                        Session {
                            hours,
                            description: description
                                .map(|d| d.trim().to_string())
                                .unwrap_or_else(|| s.description.clone()),
                            ..s.clone()
                        }
                    } else {
                        s.clone()
                    }
                })
                .collect();

            Ok(Client {
                total_hours: c.total_hours + delta,
                sessions,
                updated_at: Some(now_rfc3339()),
                ..c.clone()
            })
        })?;

        let session = updated.sessions[position - 1].clone();
        self.local
            .audit("edit_session", client_id, &format!("#{} → {:.4}h", position, hours));
        Ok(session)
    }

    pub fn delete_session(&mut self, client_id: &str, position: usize) -> AppResult<Session> {
        let mut removed = None;

        self.replace_client(client_id, |c| {
            let idx = c
                .session_index(position)
                .ok_or(AppError::InvalidSession(position))?;
            let old = c.sessions[idx].clone();

            let sessions = c
                .sessions
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, s)| s.clone())
                .collect();

            let client = Client {
                total_hours: c.total_hours - old.hours,
                sessions,
                updated_at: Some(now_rfc3339()),
                ..c.clone()
            };
            removed = Some(old);
            Ok(client)
        })?;

        let removed = removed.ok_or(AppError::InvalidSession(position))?;
        self.local
            .audit("delete_session", client_id, &format!("#{} ({:.4}h)", position, removed.hours));
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Calendar events
    // ------------------------------------------------------------------

    pub fn add_calendar_event(&mut self, draft: EventDraft) -> AppResult<CalendarEvent> {
        let date = validate_event(
            &draft.date,
            draft.hours,
            &draft.description,
            draft.start_time.as_deref(),
            draft.end_time.as_deref(),
        )?;
        let draft = EventDraft {
            date,
            description: draft.description.trim().to_string(),
            ..draft
        };

        let client_name = match &draft.client_id {
            Some(id) => Some(
                self.client(id)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| AppError::ClientNotFound(id.clone()))?,
            ),
            None => None,
        };

        let event = CalendarEvent::from_draft(new_id(), draft, client_name, now_rfc3339());
        log::debug!("adding calendar event {} on {}", event.id, event.date);

        let mut next = self.events.clone();
        next.push(event.clone());
        self.events = next;
        self.push_events(&[event.id.as_str()]);

        self.local
            .audit("add_event", &event.id, &format!("{} {}", event.date, event.kind));
        Ok(event)
    }

    /// Full-record replacement of the event with the same id.
    pub fn update_calendar_event(&mut self, event: CalendarEvent) -> AppResult<CalendarEvent> {
        let date = validate_event(
            &event.date,
            event.hours,
            &event.description,
            event.start_time.as_deref(),
            event.end_time.as_deref(),
        )?;

        if !self.events.iter().any(|e| e.id == event.id) {
            return Err(AppError::EventNotFound(event.id));
        }

        let updated = CalendarEvent {
            date,
            description: event.description.trim().to_string(),
            updated_at: Some(now_rfc3339()),
            ..event
        };

        let next: Vec<CalendarEvent> = self
            .events
            .iter()
            .map(|e| if e.id == updated.id { updated.clone() } else { e.clone() })
            .collect();
        self.events = next;
        self.push_events(&[updated.id.as_str()]);

        self.local.audit("edit_event", &updated.id, &updated.date);
        Ok(updated)
    }

    pub fn delete_calendar_event(&mut self, id: &str) -> AppResult<CalendarEvent> {
        let removed = self
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AppError::EventNotFound(id.to_string()))?;

        let next: Vec<CalendarEvent> = self.events.iter().filter(|e| e.id != id).cloned().collect();
        self.events = next;
        self.push_events(&[]);
        self.push_delete(Table::CalendarEvents, id);

        self.local.audit("delete_event", id, &removed.date);
        Ok(removed)
    }
}

impl SessionSink for DataStore {
    fn add_time_session(&mut self, client_id: &str, hours: f64, description: &str) -> AppResult<()> {
        DataStore::add_time_session(self, client_id, hours, description).map(|_| ())
    }
}
