use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::store::LocalCache;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let mut cache = LocalCache::open(&cfg.database)?;
        LogLogic::print_log(cache.pool())?;
    }

    Ok(())
}
