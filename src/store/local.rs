//! Synchronous local tier: JSON collections under fixed keys in SQLite.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{cache_entries, cache_get, cache_remove, cache_set};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const CLIENTS_KEY: &str = "timeTrackingClients";
pub const EVENTS_KEY: &str = "timeTrackingEvents";
pub const LAST_SESSION_KEY: &str = "timeTrackingLastSession";

pub struct LocalCache {
    pool: DbPool,
}

impl LocalCache {
    /// Open (creating if needed) the cache database and apply migrations.
    pub fn open(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn pool(&mut self) -> &mut DbPool {
        &mut self.pool
    }

    pub fn path(&self) -> String {
        self.pool.path()
    }

    /// Decode the value under `key`. A missing key is `Ok(None)`; malformed
    /// JSON is `AppError::CorruptCache`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match cache_get(&self.pool.conn, key)? {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| AppError::CorruptCache {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let text = serde_json::to_string(value)?;
        cache_set(&self.pool.conn, key, &text)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        cache_remove(&self.pool.conn, key)?;
        Ok(())
    }

    /// `(key, bytes, updated_at)` of every stored collection.
    pub fn entries(&self) -> AppResult<Vec<(String, usize, String)>> {
        Ok(cache_entries(&self.pool.conn)?)
    }

    /// Append to the audit log; failures only reach the diagnostic log.
    pub fn audit(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            log::warn!("failed to write audit log: {}", e);
        }
    }
}
