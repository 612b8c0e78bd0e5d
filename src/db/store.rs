//! `RecordStore` over a SQLite connection.

use crate::db::log::{LogOp, ttlog_or_warn};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::store::{InsertOutcome, RecordStore, Row, check_identifier};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, ffi, params_from_iter};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            conn: Mutex::new(pool.into_inner()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Run `f` with the underlying connection (logging, reports, maintenance).
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        f(&*self.lock())
    }

    /// Internal log line; never fails the caller.
    pub fn log(&self, op: LogOp, target: &str, message: &str) {
        ttlog_or_warn(&self.lock(), op, target, message);
    }
}

/// Busy/locked past the busy timeout is a timeout, everything else a plain
/// database error.
fn classify(e: rusqlite::Error) -> AppError {
    match e.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
            AppError::StoreTimeout(e.to_string())
        }
        _ => AppError::Db(e),
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn value_to_string(v: ValueRef<'_>) -> Option<String> {
    match v {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

impl RecordStore for SqliteStore {
    fn query(&self, table: &str, filters: &[(&str, &str)]) -> AppResult<Vec<Row>> {
        let mut sql = format!("SELECT * FROM \"{}\"", check_identifier(table)?);
        for (i, (col, _)) in filters.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("\"{}\" = ?{}", check_identifier(col)?, i + 1));
        }

        let conn = self.lock();
        let mut stmt = conn.prepare(&sql).map_err(classify)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt
            .query(params_from_iter(filters.iter().map(|(_, v)| *v)))
            .map_err(classify)?;

        let mut out = Vec::new();
        while let Some(r) = rows.next().map_err(classify)? {
            let mut row = Row::new();
            for (i, name) in columns.iter().enumerate() {
                if let Some(v) = value_to_string(r.get_ref(i).map_err(classify)?) {
                    row.insert(name.clone(), v);
                }
            }
            out.push(row);
        }
        Ok(out)
    }

    fn insert(&self, table: &str, row: &Row) -> AppResult<InsertOutcome> {
        if row.is_empty() {
            return Err(AppError::Store(format!("empty row for {table}")));
        }

        let mut cols = Vec::with_capacity(row.len());
        let mut marks = Vec::with_capacity(row.len());
        for (i, col) in row.keys().enumerate() {
            cols.push(format!("\"{}\"", check_identifier(col)?));
            marks.push(format!("?{}", i + 1));
        }
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            check_identifier(table)?,
            cols.join(", "),
            marks.join(", ")
        );

        let conn = self.lock();
        match conn.execute(&sql, params_from_iter(row.values())) {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Conflict),
            Err(e) => Err(classify(e)),
        }
    }
}
