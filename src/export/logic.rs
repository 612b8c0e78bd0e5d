use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::export::AttendanceExport;
use crate::export::ExportFormat;
use crate::export::json_csv::write_rows;
use crate::ui::messages::warning;
use crate::utils::date::parse_period;
use crate::utils::path::{ensure_writable, require_absolute};
use rusqlite::Connection;

pub struct ExportLogic;

impl ExportLogic {
    /// Export one student's attendance rows.
    ///
    /// - `file`: absolute output path
    /// - `range`: `None`, `"all"` or a period (`YYYY`, `YYYY-MM`,
    ///   `YYYY-MM-DD`, `start:end`)
    ///
    /// Returns the number of rows written; nothing is written for an empty
    /// selection.
    pub fn export(
        conn: &Connection,
        student: &str,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = require_absolute(file)?;

        let bounds = match range {
            None => None,
            Some(r) => parse_period(r)?,
        };

        let rows: Vec<AttendanceExport> = load_records(conn, student, bounds)?
            .iter()
            .map(AttendanceExport::from)
            .collect();

        if rows.is_empty() {
            warning("No attendance records found for selected range.");
            return Ok(0);
        }

        ensure_writable(&path, force)?;

        write_rows(format, &rows, &path)?;

        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use std::env;
    use std::fs;

    fn conn() -> Connection {
        let c = Connection::open_in_memory().unwrap();
        init_db(&c).unwrap();
        c.execute_batch(
            r#"
            INSERT INTO Attendance VALUES ('ALICE', '2024-03-01', '09:00:00', 'Student App');
            INSERT INTO Attendance VALUES ('ALICE', '2024-04-02', '09:05:00', 'Student App');
            INSERT INTO Attendance VALUES ('BOB',   '2024-03-01', '09:30:00', 'Student App');
            "#,
        )
        .unwrap();
        c
    }

    fn out(name: &str) -> String {
        env::temp_dir()
            .join(format!("qrattend_export_{name}_{}", std::process::id()))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn csv_has_header_and_only_own_rows() {
        let file = out("a.csv");
        let n = ExportLogic::export(&conn(), "ALICE", ExportFormat::Csv, &file, None, true).unwrap();
        assert_eq!(n, 2);

        let content = fs::read_to_string(&file).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Name,Date,Time,Method"));
        assert_eq!(lines.next(), Some("ALICE,2024-03-01,09:00:00,Student App"));
        assert!(!content.contains("BOB"));
    }

    #[test]
    fn json_respects_range() {
        let file = out("a.json");
        let n = ExportLogic::export(
            &conn(),
            "ALICE",
            ExportFormat::Json,
            &file,
            Some("2024-04"),
            true,
        )
        .unwrap();
        assert_eq!(n, 1);

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(v[0]["Date"], "2024-04-02");
        assert_eq!(v.as_array().unwrap().len(), 1);
    }

    #[test]
    fn empty_selection_writes_nothing() {
        let file = out("empty.csv");
        let _ = fs::remove_file(&file);
        let n = ExportLogic::export(&conn(), "CAROL", ExportFormat::Csv, &file, None, true).unwrap();
        assert_eq!(n, 0);
        assert!(!std::path::Path::new(&file).exists());
    }

    #[test]
    fn relative_path_and_bad_range_fail() {
        assert!(ExportLogic::export(&conn(), "ALICE", ExportFormat::Csv, "x.csv", None, true).is_err());
        assert!(
            ExportLogic::export(&conn(), "ALICE", ExportFormat::Csv, &out("r.csv"), Some("bad"), true)
                .is_err()
        );
    }
}
