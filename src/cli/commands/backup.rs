use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::store::LocalCache;
use crate::utils::path::expand_tilde_str;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let mut cache = LocalCache::open(&cfg.database)?;
        BackupLogic::backup(&mut cache, &expand_tilde_str(file), *compress, *force)?;
    }

    Ok(())
}
