use crate::db::log::{LogOp, ttlog};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

pub const UNIQUE_INDEX: &str = "idx_attendance_name_date";

const V_SCHEMA: &str = "20240901_0001_create_schema";
const V_UNIQUE: &str = "20240915_0002_attendance_unique_name_date";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    ttlog(conn, LogOp::MigrationApplied, version, message)?;
    success(format!("Migration applied: {version} → {message}"));
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    Ok(stmt.query_row([table], |_| Ok(())).optional()?.is_some())
}

fn index_exists(conn: &Connection, index: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 LIMIT 1")?;
    Ok(stmt.query_row([index], |_| Ok(())).optional()?.is_some())
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students_data (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            Name         TEXT NOT NULL,
            Parent_Gmail TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS Attendance (
            Name   TEXT NOT NULL,
            Date   TEXT NOT NULL,
            Time   TEXT NOT NULL,
            Method TEXT NOT NULL DEFAULT 'Student App'
        );

        CREATE INDEX IF NOT EXISTS idx_students_name ON students_data(Name);
        "#,
    )?;
    Ok(())
}

/// Rows that would violate the `(Name, Date)` unique index.
fn count_duplicates(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) - COUNT(DISTINCT Name || char(31) || Date) FROM Attendance",
        [],
        |row| row.get(0),
    )
}

/// Zip the database file next to itself before a destructive migration.
fn backup_before_migration(db_path: &str) -> AppResult<()> {
    let src = Path::new(db_path);
    let dir = src.parent().unwrap_or_else(|| Path::new("."));
    let backup_path = dir.join(format!(
        "{}-backup_db_pre_unique_attendance.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    ));

    let mut zip = ZipWriter::new(File::create(&backup_path)?);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| AppError::Migration(format!("Backup failed (start_file): {e}")))?;
    zip.write_all(&fs::read(src)?)?;
    zip.finish()
        .map_err(|e| AppError::Migration(format!("Backup failed (finish): {e}")))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Enforce one attendance row per student per day. Existing same-day
/// duplicates are removed first, keeping the earliest row.
fn migrate_unique_attendance(conn: &Connection) -> AppResult<()> {
    if index_exists(conn, UNIQUE_INDEX)? {
        if !is_applied(conn, V_UNIQUE)? {
            mark_applied(conn, V_UNIQUE, "unique (Name, Date) index on Attendance")?;
        }
        return Ok(());
    }

    let duplicates = count_duplicates(conn)?;
    if duplicates > 0 {
        warning(format!(
            "Found {duplicates} duplicate attendance row(s); creating safety backup before migration..."
        ));

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warning("Could not determine DB path, backup skipped.");
        } else {
            backup_before_migration(&db_path)?;
        }

        conn.execute(
            "DELETE FROM Attendance
             WHERE rowid NOT IN (SELECT MIN(rowid) FROM Attendance GROUP BY Name, Date)",
            [],
        )?;
    }

    conn.execute_batch(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {UNIQUE_INDEX} ON Attendance(Name, Date);"
    ))?;

    mark_applied(
        conn,
        V_UNIQUE,
        &format!("unique (Name, Date) index on Attendance, {duplicates} duplicate(s) removed"),
    )
}

/// Public entry point: run all pending migrations.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    let fresh = !table_exists(conn, "Attendance")? || !table_exists(conn, "students_data")?;
    create_tables(conn)?;
    if fresh && !is_applied(conn, V_SCHEMA)? {
        mark_applied(conn, V_SCHEMA, "created students_data and Attendance tables")?;
    }

    migrate_unique_attendance(conn)
}
