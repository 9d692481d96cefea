use crate::core::calendar::WeekStart;
use crate::errors::AppResult;
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

pub const ENV_REMOTE_URL: &str = "RTIMEBOARD_REMOTE_URL";
pub const ENV_REMOTE_KEY: &str = "RTIMEBOARD_REMOTE_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Base URL of the hosted table service (empty: remote tier disabled).
    #[serde(default)]
    pub remote_url: String,
    #[serde(default)]
    pub remote_api_key: String,
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,
    #[serde(default)]
    pub week_start: WeekStart,
}

pub(crate) fn default_remote_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            remote_url: String::new(),
            remote_api_key: String::new(),
            remote_timeout_secs: default_remote_timeout(),
            week_start: WeekStart::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rtimeboard")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rtimeboard")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimeboard.conf")
    }

    /// Return the default path of the local cache database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimeboard.sqlite")
    }

    /// Load configuration from file (defaults when missing), then apply
    /// environment overrides.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = env::var(ENV_REMOTE_URL)
            && !url.trim().is_empty()
        {
            cfg.remote_url = url;
        }
        if let Ok(key) = env::var(ENV_REMOTE_KEY)
            && !key.trim().is_empty()
        {
            cfg.remote_api_key = key;
        }

        Ok(cfg)
    }

    pub fn remote_enabled(&self) -> bool {
        !self.remote_url.trim().is_empty() && !self.remote_api_key.trim().is_empty()
    }

    /// Initialize configuration directory and file; returns the database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB path: user provided (relative to the config dir) or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::load()?
            };
            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
