use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Login state of the front end, passed into and returned from handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub student_name: Option<String>,
}

impl Session {
    pub fn logged_in_as(name: String) -> Self {
        Self {
            logged_in: true,
            student_name: Some(name),
        }
    }

    /// Name of the logged-in student, or `NotLoggedIn`.
    pub fn require_student(&self) -> AppResult<&str> {
        match (&self.logged_in, &self.student_name) {
            (true, Some(name)) => Ok(name),
            _ => Err(AppError::NotLoggedIn),
        }
    }

    /// Missing file means logged out.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("session file {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, yaml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn default_session_requires_login() {
        let s = Session::default();
        assert!(matches!(s.require_student(), Err(AppError::NotLoggedIn)));
    }

    #[test]
    fn inconsistent_state_is_treated_as_logged_out() {
        let s = Session {
            logged_in: true,
            student_name: None,
        };
        assert!(s.require_student().is_err());
    }

    #[test]
    fn save_then_load() {
        let mut path = env::temp_dir();
        path.push("qrattend_session_unit_test.yml");
        fs::remove_file(&path).ok();

        assert_eq!(Session::load(&path).unwrap(), Session::default());

        let s = Session::logged_in_as("ALICE".into());
        s.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), s);

        fs::remove_file(&path).ok();
    }
}
