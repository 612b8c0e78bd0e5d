use crate::models::attendance::AttendanceRecord;
use serde::Serialize;

/// Flat export row; field names follow the `Attendance` columns.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AttendanceExport {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Method")]
    pub method: String,
}

impl From<&AttendanceRecord> for AttendanceExport {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            name: r.name.clone(),
            date: r.date.clone(),
            time: r.time.clone(),
            method: r.method.clone(),
        }
    }
}
