use crate::db::log::LogOp;
use crate::errors::AppResult;
use crate::utils::colors::{truncate_to_width, visible_width};
use ansi_term::Colour;
use rusqlite::Connection;

const MAX_OP_WIDTH: usize = 60;

fn color_for_operation(op: &str) -> Colour {
    match LogOp::parse(op) {
        Some(LogOp::Marked | LogOp::Login) => Colour::Green,
        Some(LogOp::Duplicate | LogOp::Logout) => Colour::Yellow,
        Some(LogOp::Rejected | LogOp::StoreError) => Colour::Red,
        Some(LogOp::MigrationApplied) => Colour::Purple,
        Some(LogOp::Backup | LogOp::Export | LogOp::Vacuum) => Colour::Blue,
        Some(LogOp::Init) => Colour::RGB(255, 153, 51),
        None => Colour::White,
    }
}

/// One row of the internal log table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn op_target(&self) -> String {
        if self.target.is_empty() {
            self.operation.clone()
        } else {
            format!("{} ({})", self.operation, self.target)
        }
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn load(conn: &Connection) -> AppResult<Vec<LogEntry>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    /// The operation word is colored; the whole `operation (target)` cell is
    /// cut to a visible width of 60.
    pub fn render_line(entry: &LogEntry, id_w: usize, date_w: usize, op_w: usize) -> String {
        let color = color_for_operation(&entry.operation);

        let truncated = truncate_to_width(&entry.op_target(), MAX_OP_WIDTH);

        let colored = match truncated.split_once(' ') {
            Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
            None => color.paint(truncated.as_str()).to_string(),
        };

        let padding = " ".repeat(op_w.saturating_sub(visible_width(&colored)));

        format!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            entry.id,
            entry.date,
            colored,
            padding,
            entry.message,
            id_w = id_w,
            date_w = date_w
        )
    }

    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = Self::load(conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| visible_width(&e.op_target()))
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");
        for e in &entries {
            println!("{}", Self::render_line(e, id_w, date_w, op_w));
        }

        Ok(())
    }
}
