//! Contract of the hosted table service.
//!
//! The service is treated as an opaque row store with three calls per
//! table. Implementations must be shareable across threads: reads for the
//! two tables run concurrently and writes are drained by a worker thread.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Remote tables mirrored by the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Clients,
    CalendarEvents,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Clients => "clients",
            Table::CalendarEvents => "calendar_events",
        }
    }

    /// Ordering used by the load path.
    pub fn default_order(&self) -> Order {
        match self {
            Table::Clients => Order::desc("created_at"),
            Table::CalendarEvents => Order::desc("date"),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected row shape: {0}")]
    Decode(String),
}

fn missing_table_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)does not exist|could not find the table").expect("valid regex")
    })
}

impl RemoteError {
    /// The table has not been created on the service yet.
    pub fn is_missing_table(&self) -> bool {
        let msg = match self {
            RemoteError::Transport(m) | RemoteError::Decode(m) => m,
            RemoteError::Api { message, .. } => message,
        };
        missing_table_pattern().is_match(msg)
    }
}

pub trait RemoteStore: Send + Sync {
    /// `select * order by <order>`
    fn select(&self, table: Table, order: &Order) -> Result<Vec<Value>, RemoteError>;

    /// Insert or replace the row with the same `id`.
    fn upsert(&self, table: Table, row: Value) -> Result<(), RemoteError>;

    /// `delete where id = <id>`
    fn delete(&self, table: Table, id: &str) -> Result<(), RemoteError>;
}
