use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of calendar entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Session,
    Meeting,
    Task,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Session => "session",
            EventType::Meeting => "meeting",
            EventType::Task => "task",
            EventType::Other => "other",
        }
    }

    /// Parse user or wire input (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "session" => Some(EventType::Session),
            "meeting" => Some(EventType::Meeting),
            "task" => Some(EventType::Task),
            "other" => Some(EventType::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
