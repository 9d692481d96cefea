use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::process::Command;

pub struct ConfigLogic;

/// One line of `config --check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingStatus {
    pub key: &'static str,
    /// Shortened value when present.
    pub value: Option<String>,
}

/// Keep the first `keep` characters of a sensitive value.
pub fn truncate_secret(value: &str, keep: usize) -> String {
    if value.chars().count() <= keep {
        value.to_string()
    } else {
        let head: String = value.chars().take(keep).collect();
        format!("{head}...")
    }
}

impl ConfigLogic {
    pub fn print(path: &str) -> AppResult<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path, e)))?;
        println!("{}", content);
        Ok(())
    }

    pub fn edit(path: &str, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot launch '{}': {}", ed, e)))?;

        if !status.success() {
            return Err(AppError::Config(format!("editor '{}' exited with {}", ed, status)));
        }
        Ok(())
    }

    /// Present/missing report for the settings the remote tier needs.
    pub fn check(cfg: &Config) -> Vec<SettingStatus> {
        let present = |v: &str, secret: bool| {
            let v = v.trim();
            if v.is_empty() {
                None
            } else if secret {
                Some(truncate_secret(v, 20))
            } else {
                Some(v.to_string())
            }
        };

        vec![
            SettingStatus {
                key: "database",
                value: present(&cfg.database, false),
            },
            SettingStatus {
                key: "remote_url",
                value: present(&cfg.remote_url, true),
            },
            SettingStatus {
                key: "remote_api_key",
                value: present(&cfg.remote_api_key, true),
            },
        ]
    }
}
