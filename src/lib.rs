//! rTimeboard library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Environment variable holding the `env_logger` filter.
pub const LOG_ENV: &str = "RTIMEBOARD_LOG";

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Client { action } => cli::commands::client::handle(action, cfg),
        Commands::Session { action } => cli::commands::session::handle(action, cfg),
        Commands::Event { action } => cli::commands::event::handle(action, cfg),
        Commands::Calendar { view, date, shift } => {
            cli::commands::calendar::handle(*view, date.as_deref(), *shift, cfg)
        }
        Commands::Timer {
            client,
            restart_last,
        } => cli::commands::timer::handle(client.as_deref(), *restart_last, cfg),
        Commands::Sync => cli::commands::sync::handle(cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .try_init();

    let cli = Cli::parse();

    // Load the configuration once, then apply command-line overrides.
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde_str(custom_db);
    }
    if cli.offline {
        cfg.remote_url.clear();
    }
    log::debug!(
        "database: {}, remote: {}",
        cfg.database,
        if cfg.remote_enabled() { "on" } else { "off" }
    );

    dispatch(&cli, &cfg)
}
