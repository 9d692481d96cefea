//! In-process table service with failure injection.

use super::remote::{Order, RemoteError, RemoteStore, Table};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    rows: HashMap<Table, Vec<Value>>,
    missing: HashSet<Table>,
    broken: HashSet<Table>,
    unreachable: bool,
    calls: Vec<String>,
}

/// Rows are kept per table in insertion order; `upsert` replaces in place.
#[derive(Default)]
pub struct MemoryRemote {
    inner: Mutex<Tables>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table directly, bypassing the call log.
    pub fn with_rows(self, table: Table, rows: Vec<Value>) -> Self {
        if let Ok(mut t) = self.inner.lock() {
            t.rows.insert(table, rows);
        }
        self
    }

    /// Make every call on `table` fail as if it had never been created.
    pub fn drop_table(&self, table: Table) {
        if let Ok(mut t) = self.inner.lock() {
            t.missing.insert(table);
        }
    }

    /// Make every call on `table` fail with a server error.
    pub fn break_table(&self, table: Table) {
        if let Ok(mut t) = self.inner.lock() {
            t.broken.insert(table);
        }
    }

    /// Make every call fail with a transport error.
    pub fn set_unreachable(&self, unreachable: bool) {
        if let Ok(mut t) = self.inner.lock() {
            t.unreachable = unreachable;
        }
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.inner
            .lock()
            .map(|t| t.rows.get(&table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// `"<op> <table>"` for every call received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().map(|t| t.calls.clone()).unwrap_or_default()
    }

    fn guard<'a>(
        &'a self,
        op: &str,
        table: Table,
    ) -> Result<std::sync::MutexGuard<'a, Tables>, RemoteError> {
        let mut t = self
            .inner
            .lock()
            .map_err(|_| RemoteError::Transport("memory store poisoned".into()))?;
        t.calls.push(format!("{} {}", op, table));

        if t.unreachable {
            return Err(RemoteError::Transport("connection refused".into()));
        }
        if t.missing.contains(&table) {
            return Err(RemoteError::Api {
                status: 404,
                message: format!("relation \"public.{}\" does not exist", table),
            });
        }
        if t.broken.contains(&table) {
            return Err(RemoteError::Api {
                status: 500,
                message: "internal server error".into(),
            });
        }
        Ok(t)
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

impl RemoteStore for MemoryRemote {
    fn select(&self, table: Table, order: &Order) -> Result<Vec<Value>, RemoteError> {
        let t = self.guard("select", table)?;
        let mut rows = t.rows.get(&table).cloned().unwrap_or_default();

        let key = |v: &Value| {
            v.get(&order.column)
                .map(|c| c.as_str().map(str::to_string).unwrap_or_else(|| c.to_string()))
                .unwrap_or_default()
        };
        rows.sort_by(|a, b| {
            let ord = key(a).cmp(&key(b));
            if order.ascending { ord } else { ord.reverse() }
        });

        Ok(rows)
    }

    fn upsert(&self, table: Table, row: Value) -> Result<(), RemoteError> {
        let mut t = self.guard("upsert", table)?;
        let id = row_id(&row)
            .ok_or_else(|| RemoteError::Api {
                status: 400,
                message: "row without id".into(),
            })?
            .to_string();

        let rows = t.rows.entry(table).or_default();
        match rows.iter_mut().find(|r| row_id(r) == Some(id.as_str())) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
        Ok(())
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), RemoteError> {
        let mut t = self.guard("delete", table)?;
        if let Some(rows) = t.rows.get_mut(&table) {
            rows.retain(|r| row_id(r) != Some(id));
        }
        Ok(())
    }
}
