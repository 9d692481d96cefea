use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::fill_missing_keys;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();
        let path_str = path.to_string_lossy().to_string();

        if *print_config {
            println!("📄 Current configuration ({}):\n", path.display());
            if path.exists() {
                ConfigLogic::print(&path_str)?;
            } else {
                info("No configuration file yet, showing defaults:");
                println!("{}", serde_yaml::to_string(cfg)?);
            }
        }

        if *check {
            println!("🔎 Configuration check:\n");
            for status in ConfigLogic::check(cfg) {
                match status.value {
                    Some(v) => println!("  ✅ {:<16} {}", status.key, v),
                    None => println!("  ❌ {:<16} missing", status.key),
                }
            }
            println!();
            if cfg.remote_enabled() {
                success("Remote store configured: changes are mirrored remotely.");
            } else {
                warning("Remote store not configured: data stays in the local cache.");
            }
        }

        if *migrate {
            if !path.exists() {
                warning(format!("{} does not exist; run `rtimeboard init` first", path.display()));
            } else {
                let added = fill_missing_keys(&path)?;
                if added.is_empty() {
                    info("Configuration file is up to date.");
                } else {
                    success(format!("Added missing keys: {}", added.join(", ")));
                }
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path_str, editor)?;
            success("Configuration file edited successfully");
        }
    }

    Ok(())
}
