//! Stopwatch bound to one selected client.
//!
//! States: idle with nothing accumulated, paused (idle with seconds
//! accumulated) and running. While running, a [`Ticker`] thread adds one
//! second to the accumulator per interval. The ticker is owned by the
//! stopwatch and stops when dropped, so leaving the running state by any
//! path (pause, reset, save, drop) also stops the tick source.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Receiver of saved stopwatch time.
pub trait SessionSink {
    fn add_time_session(&mut self, client_id: &str, hours: f64, description: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchState {
    Idle,
    Paused,
    Running,
}

/// The most recent successful save, used by [`Stopwatch::restart_last`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSession {
    pub client_id: String,
    pub hours: f64,
}

/// Seconds → hours, rounded to 4 decimal places.
pub fn seconds_to_hours(seconds: u64) -> f64 {
    (seconds as f64 / 3600.0 * 10_000.0).round() / 10_000.0
}

/// Background tick source. Dropping it stops and joins the thread.
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(interval: Duration, counter: Arc<AtomicU64>) -> AppResult<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("stopwatch-tick".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            counter.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|e| AppError::Stopwatch(format!("cannot start tick thread: {}", e)))?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub struct Stopwatch {
    seconds: Arc<AtomicU64>,
    interval: Option<Duration>,
    ticker: Option<Ticker>,
    running: bool,
    selected: Option<String>,
    last_session: Option<LastSession>,
}

impl Stopwatch {
    /// Real stopwatch: one tick per `interval` while running.
    pub fn new(interval: Duration) -> Self {
        Self {
            seconds: Arc::new(AtomicU64::new(0)),
            interval: Some(interval),
            ticker: None,
            running: false,
            selected: None,
            last_session: None,
        }
    }

    /// Stopwatch without a background thread; time advances only through
    /// [`Stopwatch::tick`].
    pub fn manual() -> Self {
        Self {
            interval: None,
            ..Self::new(Duration::from_secs(1))
        }
    }

    pub fn state(&self) -> StopwatchState {
        if self.running {
            StopwatchState::Running
        } else if self.elapsed() > 0 {
            StopwatchState::Paused
        } else {
            StopwatchState::Idle
        }
    }

    /// Accumulated seconds.
    pub fn elapsed(&self) -> u64 {
        self.seconds.load(Ordering::SeqCst)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, client_id: Option<String>) {
        self.selected = client_id;
    }

    pub fn last_session(&self) -> Option<&LastSession> {
        self.last_session.as_ref()
    }

    /// Seed the restart target (e.g. from the local cache).
    pub fn set_last_session(&mut self, last: Option<LastSession>) {
        self.last_session = last;
    }

    /// Idle/paused → running. Requires a selected client; a no-op when
    /// already running.
    pub fn start(&mut self) -> AppResult<()> {
        if self.selected.is_none() {
            return Err(AppError::Stopwatch(
                "select a client before starting the timer".into(),
            ));
        }
        if self.running {
            return Ok(());
        }

        if let Some(interval) = self.interval {
            self.ticker = Some(Ticker::spawn(interval, Arc::clone(&self.seconds))?);
        }
        self.running = true;
        log::debug!("stopwatch started at {}s", self.elapsed());
        Ok(())
    }

    /// Running → paused. The accumulator keeps its value.
    pub fn pause(&mut self) {
        if self.running {
            self.ticker = None;
            self.running = false;
            log::debug!("stopwatch paused at {}s", self.elapsed());
        }
    }

    /// Any state → idle with nothing accumulated.
    pub fn reset(&mut self) {
        self.ticker = None;
        self.running = false;
        self.seconds.store(0, Ordering::SeqCst);
        log::debug!("stopwatch reset");
    }

    /// Advance by one second when running. Used by manual stopwatches; a
    /// ticking stopwatch also accepts it.
    pub fn tick(&mut self) {
        if self.running {
            self.seconds.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Hand the accumulated time to `sink` as hours.
    ///
    /// Whatever the outcome, the stopwatch ends idle with no client
    /// selected. Returns the saved session, `Ok(None)` when there was
    /// nothing to save, or the sink's error.
    pub fn save<S: SessionSink + ?Sized>(
        &mut self,
        sink: &mut S,
        description: &str,
    ) -> AppResult<Option<LastSession>> {
        // Freeze the value before handing it over.
        self.pause();
        let seconds = self.elapsed();

        let result = match (&self.selected, seconds) {
            (Some(client_id), s) if s > 0 => {
                let hours = seconds_to_hours(s);
                match sink.add_time_session(client_id, hours, description) {
                    Ok(()) => {
                        let last = LastSession {
                            client_id: client_id.clone(),
                            hours,
                        };
                        self.last_session = Some(last.clone());
                        Ok(Some(last))
                    }
                    Err(e) => {
                        log::error!("saving stopwatch time failed: {}", e);
                        Err(e)
                    }
                }
            }
            _ => Ok(None),
        };

        self.reset();
        self.selected = None;
        result
    }

    /// Select the client of the last saved session, reset and start.
    pub fn restart_last(&mut self) -> AppResult<&LastSession> {
        let client_id = self
            .last_session
            .as_ref()
            .map(|l| l.client_id.clone())
            .ok_or_else(|| AppError::Stopwatch("no previous session to restart".into()))?;

        self.selected = Some(client_id);
        self.reset();
        self.start()?;

        self.last_session
            .as_ref()
            .ok_or_else(|| AppError::Stopwatch("no previous session to restart".into()))
    }
}
