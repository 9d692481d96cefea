use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Raw JSON text stored under `key`, if any.
pub fn cache_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT value FROM cache WHERE key = ?1")?;
    stmt.query_row([key], |row| row.get(0)).optional()
}

/// Insert or replace the JSON text stored under `key`.
pub fn cache_set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let mut stmt = conn.prepare_cached(
        "INSERT INTO cache (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )?;
    stmt.execute(params![key, value, now])?;
    Ok(())
}

pub fn cache_remove(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM cache WHERE key = ?1", [key])?;
    Ok(())
}

/// `(key, bytes, updated_at)` for every cache entry.
pub fn cache_entries(conn: &Connection) -> Result<Vec<(String, usize, String)>> {
    let mut stmt =
        conn.prepare_cached("SELECT key, length(value), updated_at FROM cache ORDER BY key ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)? as usize,
            row.get::<_, String>(2)?,
        ))
    })?;
    rows.collect()
}
