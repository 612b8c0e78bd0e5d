//! Wall-clock collaborator used by the validator (epoch seconds) and the
//! recorder (local date and time strings).

use crate::utils::date::DATE_FMT;
use crate::utils::time::TIME_FMT;
use chrono::{Local, NaiveDateTime, Utc};

pub trait TimeSource {
    /// Local wall-clock time.
    fn local_now(&self) -> NaiveDateTime;

    /// Unix seconds, whole-second resolution.
    fn epoch_seconds(&self) -> i64;

    /// `("YYYY-MM-DD", "HH:MM:SS")` taken from a single reading.
    fn stamp(&self) -> (String, String) {
        let now = self.local_now();
        (
            now.format(DATE_FMT).to_string(),
            now.format(TIME_FMT).to_string(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Frozen clock. Both readings are independent so tests can pick any
/// local date together with any epoch value.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub local: NaiveDateTime,
    pub epoch: i64,
}

impl FixedClock {
    pub fn new(local: NaiveDateTime, epoch: i64) -> Self {
        Self { local, epoch }
    }

    /// `local` given as "YYYY-MM-DD HH:MM:SS".
    pub fn at(local: &str, epoch: i64) -> Option<Self> {
        let local = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S").ok()?;
        Some(Self::new(local, epoch))
    }
}

impl TimeSource for FixedClock {
    fn local_now(&self) -> NaiveDateTime {
        self.local
    }

    fn epoch_seconds(&self) -> i64 {
        self.epoch
    }
}
