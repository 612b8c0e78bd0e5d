//! Unified application error type.
//! All modules (db, store, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::models::token::Rejection;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database / record store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Record store timed out: {0}")]
    StoreTimeout(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid or expired QR code: {0}")]
    InvalidToken(Rejection),

    #[error("No QR code detected")]
    NoQrCode,

    // ---------------------------
    // Session / login
    // ---------------------------
    #[error("Not logged in: run `qrattend login` first")]
    NotLoggedIn,

    #[error("Invalid credentials: check your name and parent's email")]
    InvalidCredentials,

    #[error("Please fill in both name and parent's email")]
    MissingCredentials,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Failures worth retrying on a read. Only timeouts qualify: a busy
    /// database may free up, anything else will fail the same way again.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::StoreTimeout(_))
    }

    /// True when the error comes from the record store (read or write).
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            AppError::Db(_) | AppError::Store(_) | AppError::StoreTimeout(_)
        )
    }

    /// Process exit code used by main.rs.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidToken(_) | AppError::NoQrCode => 2,
            e if e.is_store_failure() => 3,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
