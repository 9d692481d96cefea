#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rtimeboard::store::LocalCache;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rtb() -> Command {
    cargo_bin_cmd!("rtimeboard")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeboard.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeboard_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh local cache for library-level tests.
pub fn fresh_cache(name: &str) -> LocalCache {
    LocalCache::open(&setup_test_db(name)).expect("open cache")
}

/// Run a command against `db_path` with the remote tier disabled.
pub fn offline(db_path: &str, args: &[&str]) -> Command {
    let mut cmd = rtb();
    cmd.args(["--db", db_path, "--offline"]).args(args);
    cmd
}

/// Initialize DB and add a client with two sessions
pub fn init_db_with_data(db_path: &str) {
    rtb()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    offline(db_path, &["client", "add", "Acme"]).assert().success();
    offline(db_path, &["session", "add", "Acme", "--hours", "2.5", "--description", "design"])
        .assert()
        .success();
    offline(db_path, &["session", "add", "Acme", "--hours", "1.25", "--description", "review"])
        .assert()
        .success();
}
