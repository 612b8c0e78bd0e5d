use crate::core::login::STUDENTS_TABLE;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::utils::date::DATE_FMT;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        name: row.get("Name")?,
        date: row.get("Date")?,
        time: row.get::<_, Option<String>>("Time")?.unwrap_or_default(),
        method: row.get::<_, Option<String>>("Method")?.unwrap_or_default(),
    })
}

/// Attendance rows of one student, oldest first. `bounds` are inclusive;
/// `None` loads everything.
pub fn load_records(
    conn: &Connection,
    name: &str,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<AttendanceRecord>> {
    let (from, to) = match bounds {
        Some((f, t)) => (f.format(DATE_FMT).to_string(), t.format(DATE_FMT).to_string()),
        None => (String::new(), "9999-12-31".to_string()),
    };

    let mut stmt = conn.prepare_cached(
        "SELECT Name, Date, Time, Method FROM Attendance
         WHERE Name = ?1 AND Date >= ?2 AND Date <= ?3
         ORDER BY Date ASC, Time ASC",
    )?;

    let rows = stmt.query_map(params![name, from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Register a student allowed to log in. Returns the new row id.
pub fn add_student(conn: &Connection, name: &str, parent_gmail: &str) -> AppResult<i64> {
    conn.execute(
        &format!("INSERT INTO {STUDENTS_TABLE} (Name, Parent_Gmail) VALUES (?1, ?2)"),
        params![name, parent_gmail],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_students(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {STUDENTS_TABLE}"), [], |r| {
        r.get(0)
    })?)
}

/// Total rows, distinct students, first and last date.
pub struct AttendanceOverview {
    pub records: i64,
    pub students: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn attendance_overview(conn: &Connection) -> AppResult<AttendanceOverview> {
    let row = conn
        .query_row(
            "SELECT COUNT(*), COUNT(DISTINCT Name), MIN(Date), MAX(Date) FROM Attendance",
            [],
            |r| {
                Ok(AttendanceOverview {
                    records: r.get(0)?,
                    students: r.get(1)?,
                    first_date: r.get(2)?,
                    last_date: r.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(row.unwrap_or(AttendanceOverview {
        records: 0,
        students: 0,
        first_date: None,
        last_date: None,
    }))
}
