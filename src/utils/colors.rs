/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";
pub const REVERSE: &str = "\x1b[7m";

use crate::models::EventType;

pub fn color_for_event_type(kind: EventType) -> &'static str {
    match kind {
        EventType::Session => GREEN,
        EventType::Meeting => CYAN,
        EventType::Task => YELLOW,
        EventType::Other => MAGENTA,
    }
}

/// Grey for cells outside the displayed month, plain otherwise.
pub fn color_for_cell(in_period: bool) -> &'static str {
    if in_period { RESET } else { GREY }
}
