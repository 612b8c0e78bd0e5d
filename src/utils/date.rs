use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

/// Persisted date format (`Attendance.Date`).
pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

/// Inclusive date bounds for a period expression, `None` meaning "all".
///
/// Supported:
/// - `all`
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
/// - `start:end` with both sides in the same format
pub fn parse_period(p: &str) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let p = p.trim();
    if p.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    if let Some((start, end)) = p.split_once(':') {
        let (start, end) = (start.trim(), end.trim());
        if start.len() != end.len() {
            return Err(AppError::InvalidDate(format!(
                "{p}: start and end must have the same format"
            )));
        }
        let (from, _) = single_period(start)?;
        let (_, to) = single_period(end)?;
        if from > to {
            return Err(AppError::InvalidDate(format!("{p}: start is after end")));
        }
        return Ok(Some((from, to)));
    }

    single_period(p).map(Some)
}

/// The current calendar month.
pub fn current_month() -> (NaiveDate, NaiveDate) {
    let t = today();
    // Day 1 and the month's last day always exist.
    let first = t.with_day(1).unwrap_or(t);
    (first, last_day_of_month(first.year(), first.month()).unwrap_or(t))
}

fn single_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let bad = || AppError::InvalidDate(p.to_string());

    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| bad())?;
            let from = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(bad)?;
            let to = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(bad)?;
            Ok((from, to))
        }
        // YYYY-MM
        7 => {
            let from = parse_date(&format!("{p}-01")).ok_or_else(bad)?;
            let to = last_day_of_month(from.year(), from.month()).ok_or_else(bad)?;
            Ok((from, to))
        }
        // YYYY-MM-DD
        10 => {
            let d = parse_date(p).ok_or_else(bad)?;
            Ok((d, d))
        }
        _ => Err(bad()),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}
