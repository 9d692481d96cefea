use crate::cli::commands::{open_store, resolve_client};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        kind,
        range,
        client,
        force,
    } = cmd
    {
        let store = open_store(cfg)?;
        let client_id = client
            .as_deref()
            .map(|c| resolve_client(&store, c))
            .transpose()?;

        let path = expand_tilde(file);
        ExportLogic::export(
            &store,
            *format,
            *kind,
            &path.to_string_lossy(),
            range.as_deref(),
            client_id.as_deref(),
            *force,
        )?;
    }
    Ok(())
}
