//! In-process record store. Has no uniqueness constraint unless one is
//! declared with `with_unique`, and can inject failures for tests.

use super::{InsertOutcome, RecordStore, Row, check_identifier};
use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// What an injected failure looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Timeout,
    Unavailable,
}

impl Fault {
    fn to_error(self, op: &str) -> AppError {
        match self {
            Fault::Timeout => AppError::StoreTimeout(format!("{op} timed out")),
            Fault::Unavailable => AppError::Store(format!("{op}: store unreachable")),
        }
    }
}

#[derive(Default)]
struct Faults {
    query: Option<(Fault, usize)>,
    insert: Option<(Fault, usize)>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    unique: HashMap<String, Vec<String>>,
    faults: Mutex<Faults>,
    query_delay: Option<Duration>,
    queries: AtomicUsize,
    inserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inserts that repeat the values of `columns` in `table`.
    pub fn with_unique(mut self, table: &str, columns: &[&str]) -> Self {
        self.unique.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Sleep inside every query, widening check-then-act windows.
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    /// The next `times` queries fail with `fault`.
    pub fn fail_queries(&self, fault: Fault, times: usize) {
        self.lock_faults().query = Some((fault, times));
    }

    /// The next `times` inserts fail with `fault`.
    pub fn fail_inserts(&self, fault: Fault, times: usize) {
        self.lock_faults().insert = Some((fault, times));
    }

    /// Number of query calls that reached the store (failed ones included).
    pub fn query_calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of insert calls that reached the store (failed ones included).
    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Snapshot of a table's rows, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock_tables().get(table).cloned().unwrap_or_default()
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Row>>> {
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn take_fault(slot: &mut Option<(Fault, usize)>) -> Option<Fault> {
        let (fault, left) = slot.as_mut()?;
        let fault = *fault;
        *left = left.saturating_sub(1);
        if *left == 0 {
            *slot = None;
        }
        Some(fault)
    }
}

impl RecordStore for MemoryStore {
    fn query(&self, table: &str, filters: &[(&str, &str)]) -> AppResult<Vec<Row>> {
        check_identifier(table)?;
        for (col, _) in filters {
            check_identifier(col)?;
        }
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(fault) = Self::take_fault(&mut self.lock_faults().query) {
            return Err(fault.to_error("query"));
        }

        let found: Vec<Row> = self
            .lock_tables()
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        filters
                            .iter()
                            .all(|(col, val)| row.get(*col).map(String::as_str) == Some(*val))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(delay) = self.query_delay {
            thread::sleep(delay);
        }

        Ok(found)
    }

    fn insert(&self, table: &str, row: &Row) -> AppResult<InsertOutcome> {
        check_identifier(table)?;
        for col in row.keys() {
            check_identifier(col)?;
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);

        if let Some(fault) = Self::take_fault(&mut self.lock_faults().insert) {
            return Err(fault.to_error("insert"));
        }

        let mut tables = self.lock_tables();
        let rows = tables.entry(table.to_string()).or_default();

        if let Some(cols) = self.unique.get(table) {
            let clash = rows
                .iter()
                .any(|existing| cols.iter().all(|c| existing.get(c) == row.get(c)));
            if clash {
                return Ok(InsertOutcome::Conflict);
            }
        }

        rows.push(row.clone());
        Ok(InsertOutcome::Inserted)
    }
}
