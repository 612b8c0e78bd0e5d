//! Exactly-once-per-day attendance recording.
//!
//! The check (query `Attendance` by `Name`+`Date`) and the insert are not
//! atomic at the store level, so two guards are layered:
//!  - a per-`(name, date)` lock inside one recorder, for stores without a
//!    uniqueness constraint;
//!  - a store-reported `Conflict` on insert (the SQLite unique index) is
//!    read as "already marked", covering separate processes.
//!
//! Only the read is retried. The insert runs at most once per call.

use crate::config::Config;
use crate::core::clock::{SystemClock, TimeSource};
use crate::core::locks::KeyedLocks;
use crate::errors::AppResult;
use crate::models::attendance::{
    ATTENDANCE_TABLE, AttendanceRecord, COL_DATE, COL_NAME, DEFAULT_METHOD, normalize_name,
};
use crate::store::{InsertOutcome, RecordStore, Row};
use std::thread;
use std::time::Duration;

/// Bounded retry for the duplicate-check read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Delay before the first retry; doubled for each following one.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        backoff: Duration::ZERO,
    };

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            retries: cfg.store_retries,
            backoff: Duration::from_millis(cfg.retry_backoff_ms),
        }
    }

    /// Run `op`, retrying transient failures only.
    pub fn run<T>(&self, mut op: impl FnMut() -> AppResult<T>) -> AppResult<T> {
        let mut delay = self.backoff;
        let mut attempt = 0;
        loop {
            match op() {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                }
                other => return other,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked(AttendanceRecord),
    AlreadyMarked { name: String, date: String },
}

impl MarkOutcome {
    /// `true` when a new record was inserted.
    pub fn is_new(&self) -> bool {
        matches!(self, MarkOutcome::Marked(_))
    }
}

pub struct AttendanceRecorder<S, C = SystemClock> {
    store: S,
    clock: C,
    method: String,
    retry: RetryPolicy,
    locks: KeyedLocks<(String, String)>,
}

impl<S: RecordStore> AttendanceRecorder<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: TimeSource> AttendanceRecorder<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            method: DEFAULT_METHOD.to_string(),
            retry: RetryPolicy::default(),
            locks: KeyedLocks::new(),
        }
    }

    pub fn method(mut self, label: impl Into<String>) -> Self {
        self.method = label.into();
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `Ok(true)`: a record was inserted. `Ok(false)`: one already existed
    /// for today. Store failures are errors, never `false`.
    pub fn mark_attendance(&self, student_name: &str) -> AppResult<bool> {
        Ok(self.mark(student_name)?.is_new())
    }

    pub fn mark(&self, student_name: &str) -> AppResult<MarkOutcome> {
        let name = normalize_name(student_name);
        let (date, time) = self.clock.stamp();
        let key = (name, date);

        self.locks.with_lock(&key, || {
            let (name, date) = &key;

            let existing = self.retry.run(|| {
                self.store.query(
                    ATTENDANCE_TABLE,
                    &[(COL_NAME, name.as_str()), (COL_DATE, date.as_str())],
                )
            })?;

            if !existing.is_empty() {
                return Ok(MarkOutcome::AlreadyMarked {
                    name: name.clone(),
                    date: date.clone(),
                });
            }

            let record = AttendanceRecord {
                name: name.clone(),
                date: date.clone(),
                time: time.clone(),
                method: self.method.clone(),
            };

            match self.store.insert(ATTENDANCE_TABLE, &record.to_row())? {
                InsertOutcome::Inserted => Ok(MarkOutcome::Marked(record)),
                InsertOutcome::Conflict => Ok(MarkOutcome::AlreadyMarked {
                    name: name.clone(),
                    date: date.clone(),
                }),
            }
        })
    }

    /// Today's record for a student, if any.
    pub fn todays_record(&self, student_name: &str) -> AppResult<Option<AttendanceRecord>> {
        let name = normalize_name(student_name);
        let (date, _) = self.clock.stamp();
        let rows: Vec<Row> = self.retry.run(|| {
            self.store
                .query(ATTENDANCE_TABLE, &[(COL_NAME, name.as_str()), (COL_DATE, date.as_str())])
        })?;
        Ok(rows.first().and_then(AttendanceRecord::from_row))
    }
}
