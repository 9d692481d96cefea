use crate::cli::commands::finish;
use crate::config::Config;
use crate::core::DataStore;
use crate::errors::AppResult;
use crate::store::{LocalCache, RemoteStore, RestRemote};
use crate::ui::messages::{info, notices, success};
use std::sync::Arc;
use std::time::Duration;

/// Run the full load path and report what ended up in memory.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let local = LocalCache::open(&cfg.database)?;

    // An explicit sync fails on a broken remote setup instead of falling back.
    let remote: Option<Arc<dyn RemoteStore>> = if cfg.remote_enabled() {
        Some(Arc::new(RestRemote::new(
            &cfg.remote_url,
            &cfg.remote_api_key,
            Duration::from_secs(cfg.remote_timeout_secs),
        )?))
    } else {
        None
    };
    let mut store = DataStore::new(local, remote);

    if !store.has_remote() {
        info("Remote store not configured: showing the local cache only.");
    }

    store.refresh();
    notices(&store.take_notices());

    let sessions: usize = store.clients().iter().map(|c| c.sessions.len()).sum();
    success(format!(
        "{} clients ({} sessions), {} calendar events",
        store.clients().len(),
        sessions,
        store.events().len()
    ));

    for (key, bytes, updated) in store.local().entries()? {
        println!("  {:<26} {:>8} bytes  {}", key, bytes, updated);
    }

    store
        .local()
        .audit("sync", "all", &format!("{} clients, {} events", store.clients().len(), store.events().len()));
    finish(&mut store);
    Ok(())
}
