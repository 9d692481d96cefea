//! Reconciliation of a local and a remote copy of the same collection.
//!
//! Entities are keyed by id. Local entities are inserted first, then each
//! remote entity either fills a gap or replaces the local copy when its
//! `updated_at` is strictly newer. Output keeps insertion order: local
//! entities first, then remote-only ones.

use crate::models::{CalendarEvent, Client};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Entities that can be reconciled by last-write-wins.
pub trait Syncable {
    fn id(&self) -> &str;
    fn updated_at(&self) -> Option<&str>;
}

impl Syncable for Client {
    fn id(&self) -> &str {
        &self.id
    }
    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

impl Syncable for CalendarEvent {
    fn id(&self) -> &str {
        &self.id
    }
    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

/// Parsed form of an `updated_at` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// Field absent: compares as the Unix epoch.
    Missing,
    Valid(DateTime<Utc>),
    /// Unparseable: every comparison against it is false.
    Invalid,
}

impl Stamp {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Stamp::Missing,
            Some(s) if s.trim().is_empty() => Stamp::Missing,
            Some(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| Stamp::Valid(dt.with_timezone(&Utc)))
                .unwrap_or(Stamp::Invalid),
        }
    }

    fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            Stamp::Missing => Some(DateTime::<Utc>::UNIX_EPOCH),
            Stamp::Valid(dt) => Some(dt),
            Stamp::Invalid => None,
        }
    }

    /// `self > other`, false whenever either side is invalid.
    pub fn is_newer_than(self, other: Stamp) -> bool {
        match (self.instant(), other.instant()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }
}

/// Merge `remote` into `local`; see the module docs for the rules.
pub fn merge<T: Syncable + Clone>(local: &[T], remote: &[T]) -> Vec<T> {
    let mut order: Vec<String> = Vec::with_capacity(local.len() + remote.len());
    let mut merged: HashMap<String, T> = HashMap::with_capacity(local.len() + remote.len());

    for item in local {
        if merged.insert(item.id().to_string(), item.clone()).is_none() {
            order.push(item.id().to_string());
        }
    }

    for item in remote {
        match merged.get(item.id()) {
            None => {
                order.push(item.id().to_string());
                merged.insert(item.id().to_string(), item.clone());
            }
            Some(existing) => {
                let remote_stamp = Stamp::parse(item.updated_at());
                let local_stamp = Stamp::parse(existing.updated_at());

                if remote_stamp == Stamp::Invalid || local_stamp == Stamp::Invalid {
                    log::warn!(
                        "unparseable updated_at for '{}' (local={:?}, remote={:?}); keeping local copy",
                        item.id(),
                        existing.updated_at(),
                        item.updated_at()
                    );
                }

                if remote_stamp.is_newer_than(local_stamp) {
                    merged.insert(item.id().to_string(), item.clone());
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| merged.remove(&id))
        .collect()
}
