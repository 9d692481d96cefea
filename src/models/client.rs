use serde::{Deserialize, Serialize};

/// One logged quantity of hours for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Empty for sessions written before ids were assigned.
    #[serde(default)]
    pub id: String,
    pub date: String, // YYYY-MM-DD
    pub hours: f64,
    #[serde(default)]
    pub description: String,
}

/// A billable party with its session history (newest first).
///
/// `total_hours` is stored, not derived: every path that touches
/// `sessions` applies the same delta to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Client {
    pub fn new(id: String, name: String, now: String) -> Self {
        Self {
            id,
            name,
            total_hours: 0.0,
            sessions: Vec::new(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }

    /// Sum of the session list, independent of the stored running total.
    pub fn sessions_total(&self) -> f64 {
        self.sessions.iter().map(|s| s.hours).sum()
    }

    /// True when the stored total agrees with the session list.
    pub fn is_consistent(&self) -> bool {
        (self.total_hours - self.sessions_total()).abs() < 1e-9
    }

    /// Resolve a 1-based position (newest first) into a vector index.
    pub fn session_index(&self, position: usize) -> Option<usize> {
        if position == 0 || position > self.sessions.len() {
            None
        } else {
            Some(position - 1)
        }
    }
}
