use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// `--editor`, then `$EDITOR`/`$VISUAL`, then the platform default.
    pub fn resolve_editor(requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    pub fn edit(path: &Path, editor: &str) -> AppResult<()> {
        let status = Command::new(editor)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start '{editor}': {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::Config(format!("'{editor}' exited with {status}")))
        }
    }

    /// Keys missing from the file; a missing file counts as complete since
    /// defaults apply.
    pub fn check(path: &Path) -> AppResult<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        migrate::missing_keys(path)
    }

    /// Add missing keys; creates the file from defaults when absent.
    pub fn migrate(path: &Path, cfg: &Config) -> AppResult<Vec<String>> {
        if !path.exists() {
            cfg.save_to(path)?;
            return Ok(Vec::new());
        }
        migrate::add_missing_keys(path)
    }
}
