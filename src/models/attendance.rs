use crate::store::Row;
use serde::Serialize;

/// Table shared with every other attendance-entry channel.
pub const ATTENDANCE_TABLE: &str = "Attendance";

pub const COL_NAME: &str = "Name";
pub const COL_DATE: &str = "Date";
pub const COL_TIME: &str = "Time";
pub const COL_METHOD: &str = "Method";

/// Origin label written by this app.
pub const DEFAULT_METHOD: &str = "Student App";

/// One student present on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub name: String,   // ⇔ Attendance.Name   (uppercase)
    pub date: String,   // ⇔ Attendance.Date   (TEXT "YYYY-MM-DD")
    pub time: String,   // ⇔ Attendance.Time   (TEXT "HH:MM:SS")
    pub method: String, // ⇔ Attendance.Method
}

impl AttendanceRecord {
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert(COL_NAME.to_string(), self.name.clone());
        row.insert(COL_DATE.to_string(), self.date.clone());
        row.insert(COL_TIME.to_string(), self.time.clone());
        row.insert(COL_METHOD.to_string(), self.method.clone());
        row
    }

    /// Rows written by other channels may lack `Time` or `Method`.
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            name: row.get(COL_NAME)?.clone(),
            date: row.get(COL_DATE)?.clone(),
            time: row.get(COL_TIME).cloned().unwrap_or_default(),
            method: row.get(COL_METHOD).cloned().unwrap_or_default(),
        })
    }
}

/// Identity normalization shared by login and the recorder.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}
