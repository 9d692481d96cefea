// src/export/logic.rs

use crate::core::data::DataStore;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{EventExport, SessionExport, sessions_of};
use crate::export::range::{in_range, parse_range};
use crate::export::{ExportFormat, ExportKind};
use crate::ui::messages::warning;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Flat session rows, optionally limited to one client and a date range.
    pub fn session_rows(
        store: &DataStore,
        client_id: Option<&str>,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> Vec<SessionExport> {
        store
            .clients()
            .iter()
            .filter(|c| client_id.is_none_or(|id| c.id == id))
            .flat_map(sessions_of)
            .filter(|s| in_range(&s.date, bounds))
            .collect()
    }

    pub fn event_rows(
        store: &DataStore,
        client_id: Option<&str>,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> Vec<EventExport> {
        store
            .events()
            .iter()
            .filter(|e| client_id.is_none_or(|id| e.client_id.as_deref() == Some(id)))
            .filter(|e| in_range(&e.date, bounds))
            .map(EventExport::from)
            .collect()
    }

    /// Export sessions or calendar events.
    ///
    /// `range`: `None`, `"all"` or one of the forms accepted by
    /// [`parse_range`].
    pub fn export(
        store: &DataStore,
        format: ExportFormat,
        kind: ExportKind,
        file: &str,
        range: Option<&str>,
        client_id: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        let bounds = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        ensure_writable(path, force)?;

        match kind {
            ExportKind::Sessions => {
                write_rows(&Self::session_rows(store, client_id, bounds), format, path)
            }
            ExportKind::Events => {
                write_rows(&Self::event_rows(store, client_id, bounds), format, path)
            }
        }
    }
}

fn write_rows<T: Serialize>(rows: &[T], format: ExportFormat, path: &Path) -> AppResult<usize> {
    if rows.is_empty() {
        warning("No rows found for the selected range.");
        return Ok(0);
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
    }
    Ok(rows.len())
}
