//! Table-like record store used by login and the attendance recorder.
//!
//! Table and column names are part of the external contract and are
//! case-sensitive (`Attendance.Name`, `students_data.Parent_Gmail`, ...).

pub mod memory;

use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One row: column → text value.
pub type Row = BTreeMap<String, String>;

/// Result of an insert against a store that may enforce uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A uniqueness constraint rejected the row; nothing was written.
    Conflict,
}

pub trait RecordStore {
    /// Rows of `table` whose columns equal every `(column, value)` filter.
    fn query(&self, table: &str, filters: &[(&str, &str)]) -> AppResult<Vec<Row>>;

    fn insert(&self, table: &str, row: &Row) -> AppResult<InsertOutcome>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn query(&self, table: &str, filters: &[(&str, &str)]) -> AppResult<Vec<Row>> {
        (**self).query(table, filters)
    }

    fn insert(&self, table: &str, row: &Row) -> AppResult<InsertOutcome> {
        (**self).insert(table, row)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn query(&self, table: &str, filters: &[(&str, &str)]) -> AppResult<Vec<Row>> {
        (**self).query(table, filters)
    }

    fn insert(&self, table: &str, row: &Row) -> AppResult<InsertOutcome> {
        (**self).insert(table, row)
    }
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

/// Reject anything that is not a plain SQL identifier before it is spliced
/// into a statement.
pub fn check_identifier(ident: &str) -> AppResult<&str> {
    if identifier_re().is_match(ident) {
        Ok(ident)
    } else {
        Err(AppError::Store(format!("invalid identifier: {ident:?}")))
    }
}
