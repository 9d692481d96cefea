pub mod backup;
pub mod calendar;
pub mod client;
pub mod config;
pub mod event;
pub mod export;
pub mod init;
pub mod log;
pub mod session;
pub mod sync;
pub mod timer;

use crate::config::Config;
use crate::core::DataStore;
use crate::errors::{AppError, AppResult};
use crate::store::{LocalCache, RemoteStore, RestRemote};
use crate::ui::messages::{notices, warning};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/// Remote tier for this run, or `None` when it is disabled or cannot be
/// set up.
pub(crate) fn remote_for(cfg: &Config) -> Option<Arc<dyn RemoteStore>> {
    if !cfg.remote_enabled() {
        ::log::debug!("remote store not configured; using the local cache only");
        return None;
    }

    match RestRemote::new(
        &cfg.remote_url,
        &cfg.remote_api_key,
        Duration::from_secs(cfg.remote_timeout_secs),
    ) {
        Ok(remote) => Some(Arc::new(remote)),
        Err(e) => {
            warning(format!("Remote store unavailable ({}), working locally", e));
            None
        }
    }
}

/// Open the local cache, attach the remote tier and run the load path.
pub(crate) fn open_store(cfg: &Config) -> AppResult<DataStore> {
    let local = LocalCache::open(&cfg.database)?;
    let mut store = DataStore::open(local, remote_for(cfg));
    notices(&store.take_notices());
    Ok(store)
}

/// Wait for queued remote writes and show whatever the run produced.
pub(crate) fn finish(store: &mut DataStore) {
    store.flush_remote();
    notices(&store.take_notices());
}

/// Client id for an id-or-name argument.
pub(crate) fn resolve_client(store: &DataStore, key: &str) -> AppResult<String> {
    store
        .find_client(key)
        .map(|c| c.id.clone())
        .ok_or_else(|| AppError::ClientNotFound(key.to_string()))
}

pub(crate) fn confirm(question: &str) -> AppResult<bool> {
    warning(format!("{} [y/N]: ", question));
    print!("> ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
