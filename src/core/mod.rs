pub mod backup;
pub mod calendar;
pub mod config;
pub mod data;
pub mod log;
pub mod stopwatch;

pub use data::{DataStore, Notice, NoticeLevel};
pub use stopwatch::{LastSession, SessionSink, Stopwatch, StopwatchState};
