//! Interactive stopwatch.
//!
//! Commands are read line by line from stdin; the elapsed value is shown
//! on `status` and after every command.

use crate::cli::commands::{finish, open_store, resolve_client};
use crate::config::Config;
use crate::core::{DataStore, LastSession, Stopwatch, StopwatchState};
use crate::errors::AppResult;
use crate::store::local::LAST_SESSION_KEY;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::formatting::hours_fixed;
use crate::utils::time::{format_hms, format_hms_short};
use std::io::{self, BufRead, Write};
use std::time::Duration;

const HELP: &str = "commands: start | pause | reset | save [DESCRIPTION] | restart | select CLIENT | status | help | quit";

pub fn handle(client: Option<&str>, restart_last: bool, cfg: &Config) -> AppResult<()> {
    let mut store = open_store(cfg)?;
    let mut watch = Stopwatch::new(Duration::from_secs(1));

    match store.local().get::<LastSession>(LAST_SESSION_KEY) {
        Ok(last) => watch.set_last_session(last),
        Err(e) => {
            log::warn!("dropping unreadable last session: {}", e);
            store.local().remove(LAST_SESSION_KEY)?;
        }
    }

    if let Some(key) = client {
        watch.select(Some(resolve_client(&store, key)?));
    }
    if restart_last {
        restart(&mut watch, &store)?;
    }

    info(HELP);
    status(&watch, &store);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("timer> ");
        io::stdout().flush().ok();

        let Some(line) = lines.next() else { break };
        let line = line?;
        let (cmd, arg) = match line.trim().split_once(' ') {
            Some((c, a)) => (c.to_string(), a.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };

        let result = match cmd.as_str() {
            "" => Ok(()),
            "start" => watch.start(),
            "pause" => {
                watch.pause();
                Ok(())
            }
            "reset" => {
                watch.reset();
                Ok(())
            }
            "save" => save(&mut watch, &mut store, &arg),
            "restart" => restart(&mut watch, &store),
            "select" => resolve_client(&store, &arg).map(|id| watch.select(Some(id))),
            "status" => Ok(()),
            "help" => {
                info(HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            other => {
                warning(format!("unknown command '{}'", other));
                Ok(())
            }
        };

        if let Err(e) = result {
            error(e);
        }
        status(&watch, &store);
    }

    if watch.elapsed() > 0 {
        warning(format!(
            "Discarding {} of unsaved time",
            format_hms(watch.elapsed())
        ));
    }
    watch.reset();

    finish(&mut store);
    Ok(())
}

fn status(watch: &Stopwatch, store: &DataStore) {
    let client = watch
        .selected()
        .and_then(|id| store.client(id))
        .map(|c| c.name.as_str())
        .unwrap_or("no client selected");
    let state = match watch.state() {
        StopwatchState::Idle => "idle",
        StopwatchState::Paused => "paused",
        StopwatchState::Running => "running",
    };
    println!("⏱  {}  [{}]  {}", format_hms(watch.elapsed()), state, client);
}

fn save(watch: &mut Stopwatch, store: &mut DataStore, description: &str) -> AppResult<()> {
    let seconds = watch.elapsed();
    match watch.save(store, description)? {
        Some(last) => {
            if let Err(e) = store.local().set(LAST_SESSION_KEY, &last) {
                log::warn!("cannot remember the last session: {}", e);
            }
            success(format!(
                "Saved {} ({}h)",
                format_hms_short(seconds),
                hours_fixed(last.hours)
            ));
        }
        None => info("Nothing to save."),
    }
    store.flush_remote();
    crate::ui::messages::notices(&store.take_notices());
    Ok(())
}

fn restart(watch: &mut Stopwatch, store: &DataStore) -> AppResult<()> {
    let last = watch.restart_last()?;
    let name = store
        .client(&last.client_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| last.client_id.clone());
    info(format!("Restarted timer for '{}' (last: {}h)", name, hours_fixed(last.hours)));
    Ok(())
}
