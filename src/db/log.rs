use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Operations recorded in the internal `log` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOp {
    Init,
    Login,
    Logout,
    Marked,
    Duplicate,
    Rejected,
    StoreError,
    Backup,
    Export,
    Vacuum,
    MigrationApplied,
}

impl LogOp {
    pub const ALL: [LogOp; 11] = [
        LogOp::Init,
        LogOp::Login,
        LogOp::Logout,
        LogOp::Marked,
        LogOp::Duplicate,
        LogOp::Rejected,
        LogOp::StoreError,
        LogOp::Backup,
        LogOp::Export,
        LogOp::Vacuum,
        LogOp::MigrationApplied,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogOp::Init => "init",
            LogOp::Login => "login",
            LogOp::Logout => "logout",
            LogOp::Marked => "marked",
            LogOp::Duplicate => "duplicate",
            LogOp::Rejected => "rejected",
            LogOp::StoreError => "store_error",
            LogOp::Backup => "backup",
            LogOp::Export => "export",
            LogOp::Vacuum => "vacuum",
            LogOp::MigrationApplied => "migration_applied",
        }
    }

    /// Rows written by older versions may carry unknown operations.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, op: LogOp, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, op.as_str(), target, message])?;

    Ok(())
}

/// Like [`ttlog`], but a failed write only prints a warning.
pub fn ttlog_or_warn(conn: &Connection, op: LogOp, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, op, target, message) {
        warning(format!("Failed to write internal log: {e}"));
    }
}
