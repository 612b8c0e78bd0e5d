//! Personal attendance statistics (the dashboard, without charts).

use crate::models::attendance::AttendanceRecord;
use crate::utils::date::parse_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    /// Distinct calendar days with at least one record.
    pub total_days: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    /// Longest run of consecutive calendar days.
    pub longest_streak: usize,
    /// Run ending today (or yesterday, when today is not marked yet).
    pub current_streak: usize,
    /// "YYYY-MM" → days attended.
    pub per_month: BTreeMap<String, usize>,
    /// Method label → records.
    pub by_method: BTreeMap<String, usize>,
}

impl AttendanceStats {
    /// Rows with an unreadable date are skipped. Duplicate rows for one day
    /// (legacy data) count once towards the day-based figures.
    pub fn compute(records: &[AttendanceRecord], today: NaiveDate) -> Self {
        let days: BTreeSet<NaiveDate> = records.iter().filter_map(|r| parse_date(&r.date)).collect();

        let mut by_method = BTreeMap::new();
        for r in records {
            let label = if r.method.is_empty() {
                "unknown".to_string()
            } else {
                r.method.clone()
            };
            *by_method.entry(label).or_insert(0) += 1;
        }

        let mut per_month = BTreeMap::new();
        for d in &days {
            *per_month.entry(d.format("%Y-%m").to_string()).or_insert(0) += 1;
        }

        let mut longest = 0;
        let mut run = 0;
        let mut prev: Option<NaiveDate> = None;
        for d in &days {
            run = match prev {
                Some(p) if p.succ_opt() == Some(*d) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(*d);
        }

        Self {
            total_days: days.len(),
            first_day: days.first().copied(),
            last_day: days.last().copied(),
            longest_streak: longest,
            current_streak: current_streak(&days, today),
            per_month,
            by_method,
        }
    }
}

fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> usize {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(y) if days.contains(&y) => y,
            _ => return 0,
        }
    };

    let mut n = 0;
    while days.contains(&cursor) {
        n += 1;
        match cursor.pred_opt() {
            Some(p) => cursor = p,
            None => break,
        }
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, method: &str) -> AttendanceRecord {
        AttendanceRecord {
            name: "ALICE".into(),
            date: date.into(),
            time: "09:00:00".into(),
            method: method.into(),
        }
    }

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn empty_history() {
        let s = AttendanceStats::compute(&[], d("2024-01-10"));
        assert_eq!(s, AttendanceStats::default());
    }

    #[test]
    fn streaks_and_months() {
        let records = vec![
            rec("2024-01-30", "Student App"),
            rec("2024-01-31", "Student App"),
            rec("2024-02-01", "Student App"),
            rec("2024-02-05", "Teacher"),
            rec("2024-02-06", "Student App"),
        ];
        let s = AttendanceStats::compute(&records, d("2024-02-07"));

        assert_eq!(s.total_days, 5);
        assert_eq!(s.first_day, Some(d("2024-01-30")));
        assert_eq!(s.last_day, Some(d("2024-02-06")));
        assert_eq!(s.longest_streak, 3);
        assert_eq!(s.current_streak, 2);
        assert_eq!(s.per_month["2024-01"], 2);
        assert_eq!(s.per_month["2024-02"], 3);
        assert_eq!(s.by_method["Student App"], 4);
        assert_eq!(s.by_method["Teacher"], 1);
    }

    #[test]
    fn current_streak_breaks_after_a_missed_day() {
        let records = vec![rec("2024-02-05", "x"), rec("2024-02-06", "x")];
        assert_eq!(AttendanceStats::compute(&records, d("2024-02-06")).current_streak, 2);
        assert_eq!(AttendanceStats::compute(&records, d("2024-02-08")).current_streak, 0);
    }

    #[test]
    fn duplicate_days_and_bad_dates() {
        let records = vec![
            rec("2024-02-05", "Student App"),
            rec("2024-02-05", "Student App"),
            rec("05/02/2024", ""),
        ];
        let s = AttendanceStats::compute(&records, d("2024-03-01"));
        assert_eq!(s.total_days, 1);
        assert_eq!(s.longest_streak, 1);
        assert_eq!(s.by_method["Student App"], 2);
        assert_eq!(s.by_method["unknown"], 1);
    }
}
