use super::list::resolve_bounds;
use super::{load_session, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::AttendanceStats;
use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, colorize_optional};
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { period } = cmd {
        let session = load_session()?;
        let student = session.require_student()?;
        let bounds = match period {
            Some(_) => resolve_bounds(period, false)?,
            None => None,
        };

        let store = open_store(cfg)?;
        let records = store.with_conn(|conn| load_records(conn, student, bounds))?;
        let s = AttendanceStats::compute(&records, date::today());

        let first = s.first_day.map(|d| d.to_string());
        let last = s.last_day.map(|d| d.to_string());

        println!("📊 Attendance statistics for {student}\n");
        println!("{CYAN}• Days attended:{RESET} {GREEN}{}{RESET}", s.total_days);
        println!("{CYAN}• First day:{RESET} {}", colorize_optional(first.as_deref()));
        println!("{CYAN}• Last day:{RESET} {}", colorize_optional(last.as_deref()));
        println!("{CYAN}• Longest streak:{RESET} {} day(s)", s.longest_streak);
        println!("{CYAN}• Current streak:{RESET} {} day(s)", s.current_streak);

        if !s.per_month.is_empty() {
            println!("{CYAN}• Per month:{RESET}");
            for (month, days) in &s.per_month {
                println!("    {month}: {days}");
            }
        }
        if !s.by_method.is_empty() {
            println!("{CYAN}• By method:{RESET}");
            for (method, n) in &s.by_method {
                println!("    {method}: {n}");
            }
        }
        println!();
    }

    Ok(())
}
