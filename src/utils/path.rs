//! Path utilities: expand ~, require absolute output paths.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Output files (backup, export) must be given as absolute paths.
pub fn require_absolute(path: &str) -> AppResult<PathBuf> {
    let p = expand_tilde(path);
    if Path::new(&p).is_absolute() {
        Ok(p)
    } else {
        Err(AppError::from(io::Error::other(format!(
            "Output file path must be absolute: {path}"
        ))))
    }
}

/// Whether `path` may be created or overwritten.
///
/// - missing file → Ok
/// - existing file with `force` → Ok
/// - existing file without `force` → ask; anything but y/yes cancels
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Other(format!(
            "cancelled: '{}' not overwritten",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_refused() {
        assert!(require_absolute("out.csv").is_err());
        assert!(require_absolute("/tmp/out.csv").is_ok());
    }

    #[test]
    fn missing_or_forced_files_are_writable() {
        assert!(ensure_writable(Path::new("/nonexistent/dir/out.csv"), false).is_ok());
        let existing = std::env::temp_dir();
        assert!(ensure_writable(&existing, true).is_ok());
    }

    #[test]
    fn tilde_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/a.sqlite"), home.join("a.sqlite"));
        }
        assert_eq!(expand_tilde("a/~/b"), PathBuf::from("a/~/b"));
    }
}
