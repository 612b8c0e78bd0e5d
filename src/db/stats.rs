use crate::db::queries::{attendance_overview, count_students};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW, colorize_optional};
use rusqlite::Connection;
use std::fs;

pub fn print_db_info(conn: &Connection, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let registered = count_students(conn)?;
    let o = attendance_overview(conn)?;

    println!("{}• Registered students:{} {}", CYAN, RESET, registered);
    println!(
        "{}• Attendance records:{} {}{}{} ({} student(s))",
        CYAN, RESET, GREEN, o.records, RESET, o.students
    );

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", colorize_optional(o.first_date.as_deref()));
    println!("    to:   {}", colorize_optional(o.last_date.as_deref()));

    println!();
    Ok(())
}
