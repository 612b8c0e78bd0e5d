use crate::errors::{AppError, AppResult};
use crate::export::{AttendanceExport, ExportFormat};
use crate::ui::messages::{info, success};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write `rows` to `path` in `format`.
pub(crate) fn write_rows(format: ExportFormat, rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to {}: {}", format.label(), path.display()));

    match format {
        ExportFormat::Csv => write_csv(rows, path)?,
        ExportFormat::Json => write_json(rows, path)?,
    }

    success(format!("{} export completed: {}", format.label(), path.display()));
    Ok(())
}

/// Pretty-printed JSON array.
fn write_json(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

/// CSV with a header row taken from the serde field names.
fn write_csv(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for item in rows {
        wtr.serialize(item)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;
    Ok(())
}
