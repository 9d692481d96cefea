use rtimeboard::core::stopwatch::seconds_to_hours;
use rtimeboard::core::{LastSession, SessionSink, Stopwatch, StopwatchState};
use rtimeboard::errors::{AppError, AppResult};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingSink {
    saved: Vec<(String, f64, String)>,
    fail: bool,
}

impl SessionSink for RecordingSink {
    fn add_time_session(&mut self, client_id: &str, hours: f64, description: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Other("sink down".into()));
        }
        self.saved
            .push((client_id.to_string(), hours, description.to_string()));
        Ok(())
    }
}

fn running_for(client: &str, seconds: u64) -> Stopwatch {
    let mut sw = Stopwatch::manual();
    sw.select(Some(client.to_string()));
    sw.start().expect("start");
    for _ in 0..seconds {
        sw.tick();
    }
    sw
}

#[test]
fn start_requires_a_client() {
    let mut sw = Stopwatch::manual();
    assert!(matches!(sw.start(), Err(AppError::Stopwatch(_))));
    assert_eq!(sw.state(), StopwatchState::Idle);
}

#[test]
fn state_transitions() {
    let mut sw = running_for("c1", 3);
    assert_eq!(sw.state(), StopwatchState::Running);
    assert_eq!(sw.elapsed(), 3);

    sw.pause();
    assert_eq!(sw.state(), StopwatchState::Paused);
    sw.tick();
    assert_eq!(sw.elapsed(), 3, "paused stopwatch must not advance");

    sw.start().expect("resume");
    sw.tick();
    assert_eq!(sw.elapsed(), 4);

    sw.reset();
    assert_eq!(sw.state(), StopwatchState::Idle);
    assert_eq!(sw.elapsed(), 0);
    assert_eq!(sw.selected(), Some("c1"));
}

#[test]
fn save_converts_to_hours_and_clears_selection() {
    let mut sw = running_for("c1", 5400);
    let mut sink = RecordingSink::default();

    let last = sw.save(&mut sink, "planning").expect("save");

    assert_eq!(
        last,
        Some(LastSession {
            client_id: "c1".into(),
            hours: 1.5
        })
    );
    assert_eq!(sink.saved, vec![("c1".to_string(), 1.5, "planning".to_string())]);
    assert_eq!(sw.state(), StopwatchState::Idle);
    assert_eq!(sw.selected(), None);
    assert_eq!(sw.last_session().map(|l| l.hours), Some(1.5));
}

#[test]
fn save_with_nothing_elapsed_is_a_no_op() {
    let mut sw = Stopwatch::manual();
    sw.select(Some("c1".into()));
    let mut sink = RecordingSink::default();

    assert_eq!(sw.save(&mut sink, "").expect("save"), None);
    assert!(sink.saved.is_empty());
    assert_eq!(sw.selected(), None);
}

#[test]
fn failed_save_still_resets() {
    let mut sw = running_for("c1", 60);
    let mut sink = RecordingSink {
        fail: true,
        ..Default::default()
    };

    assert!(sw.save(&mut sink, "x").is_err());
    assert_eq!(sw.state(), StopwatchState::Idle);
    assert_eq!(sw.elapsed(), 0);
    assert_eq!(sw.selected(), None);
    assert!(sw.last_session().is_none());
}

#[test]
fn restart_last_selects_and_runs() {
    let mut sw = running_for("c7", 10);
    let mut sink = RecordingSink::default();
    sw.save(&mut sink, "").expect("save");

    let last = sw.restart_last().expect("restart").clone();
    assert_eq!(last.client_id, "c7");
    assert_eq!(sw.selected(), Some("c7"));
    assert_eq!(sw.state(), StopwatchState::Running);
    assert_eq!(sw.elapsed(), 0);
}

#[test]
fn restart_without_history_fails() {
    let mut sw = Stopwatch::manual();
    assert!(sw.restart_last().is_err());
}

#[test]
fn hours_are_rounded_to_four_decimals() {
    assert_eq!(seconds_to_hours(3600), 1.0);
    assert_eq!(seconds_to_hours(1), 0.0003);
    assert_eq!(seconds_to_hours(7), 0.0019);
    assert_eq!(seconds_to_hours(0), 0.0);
}

/// Polls until the ticker has counted at least once; the deadline only
/// guards against a ticker that never runs.
fn wait_for_first_tick(sw: &Stopwatch) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while sw.elapsed() == 0 {
        assert!(Instant::now() < deadline, "ticker never advanced");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn ticker_runs_only_while_running() {
    let mut sw = Stopwatch::new(Duration::from_millis(5));
    sw.select(Some("c1".into()));
    sw.start().expect("start");
    assert!(sw.is_ticking());

    wait_for_first_tick(&sw);
    sw.pause();
    assert!(!sw.is_ticking());

    // pause joins the tick thread, so nothing can advance the value now
    let frozen = sw.elapsed();
    assert!(frozen > 0);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(sw.elapsed(), frozen);

    sw.start().expect("resume");
    assert!(sw.is_ticking());
    sw.reset();
    assert!(!sw.is_ticking());
    assert_eq!(sw.elapsed(), 0);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(sw.elapsed(), 0);
}

#[test]
fn save_stops_the_ticker() {
    let mut sw = Stopwatch::new(Duration::from_millis(5));
    sw.select(Some("c1".into()));
    sw.start().expect("start");
    wait_for_first_tick(&sw);

    let mut sink = RecordingSink::default();
    sw.save(&mut sink, "").expect("save");
    assert!(!sw.is_ticking());
    assert_eq!(sw.elapsed(), 0);
    assert_eq!(sink.saved.len(), 1);
    assert!(sink.saved[0].1 > 0.0);
}
