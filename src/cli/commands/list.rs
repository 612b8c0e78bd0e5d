use super::{load_session, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::colors::{RESET, color_for_method};
use crate::utils::date;
use crate::utils::table::Table;
use chrono::NaiveDate;

/// `--today`, then `--period`, then the current month.
pub(crate) fn resolve_bounds(
    period: &Option<String>,
    today: bool,
) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    if today {
        let t = date::today();
        return Ok(Some((t, t)));
    }
    match period {
        Some(p) => date::parse_period(p),
        None => Ok(Some(date::current_month())),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period, today } = cmd {
        let session = load_session()?;
        let student = session.require_student()?;
        let bounds = resolve_bounds(period, *today)?;

        let store = open_store(cfg)?;
        let records = store.with_conn(|conn| load_records(conn, student, bounds))?;

        if records.is_empty() {
            warning("No attendance records found for the selected period.");
            return Ok(());
        }

        let mut table = Table::new(&["Date", "Time", "Method"]);
        for r in &records {
            let color = color_for_method(&r.method, &cfg.method_label);
            table.add_row(vec![
                r.date.clone(),
                r.time.clone(),
                format!("{color}{}{RESET}", r.method),
            ]);
        }

        println!("📅 Attendance for {student}\n");
        print!("{}", table.render());
        println!();
        info(format!("{} record(s)", records.len()));
    }

    Ok(())
}
