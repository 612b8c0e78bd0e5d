use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

pub const APP_DIR: &str = ".qrattend";
pub const CONFIG_FILE: &str = "qrattend.conf";
pub const DATABASE_FILE: &str = "qrattend.sqlite";
pub const SESSION_FILE: &str = "session.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Maximum token age, in seconds, still accepted by `scan`.
    #[serde(default = "default_window")]
    pub freshness_window_secs: u64,
    /// When false the typed session id is never compared.
    #[serde(default = "default_true")]
    pub enforce_session_id: bool,
    /// Written to `Attendance.Method`.
    #[serde(default = "default_method_label")]
    pub method_label: String,
    /// SQLite busy timeout.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// Extra attempts for the duplicate check (reads only).
    #[serde(default = "default_store_retries")]
    pub store_retries: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_window() -> u64 {
    crate::core::validator::DEFAULT_WINDOW_SECS
}
fn default_true() -> bool {
    true
}
fn default_method_label() -> String {
    crate::models::attendance::DEFAULT_METHOD.to_string()
}
fn default_store_timeout() -> u64 {
    5000
}
fn default_store_retries() -> u32 {
    2
}
fn default_retry_backoff() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            freshness_window_secs: default_window(),
            enforce_session_id: default_true(),
            method_label: default_method_label(),
            store_timeout_ms: default_store_timeout(),
            store_retries: default_store_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

impl Config {
    /// `~/.qrattend`, or `./.qrattend` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DATABASE_FILE)
    }

    pub fn session_file() -> PathBuf {
        Self::config_dir().join(SESSION_FILE)
    }

    /// Load the configuration file, or defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)
    }

    /// Create the config directory, the config file (skipped in test mode)
    /// and an empty database file. Returns the database path.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join(DATABASE_FILE),
        };

        if !is_test {
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save_to(&Self::config_file())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}
