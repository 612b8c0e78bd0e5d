use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::LogOp;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use rusqlite::Connection;

fn integrity_check(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    if result == "ok" {
        Ok(())
    } else {
        Err(AppError::Store(format!("integrity check failed: {result}")))
    }
}

/// `--migrate` is implicit: opening the store applies pending migrations.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        let store = open_store(cfg)?;

        if *migrate {
            success("Database schema is up to date.");
        }

        if *show_info {
            store.with_conn(|conn| stats::print_db_info(conn, &cfg.database))?;
        }

        if *check {
            info("Running integrity check…");
            store.with_conn(integrity_check)?;
            success("Integrity check passed.");
        }

        if *vacuum {
            info("Running VACUUM…");
            store.with_conn(|conn| Ok(conn.execute_batch("VACUUM;")?))?;
            store.log(LogOp::Vacuum, &cfg.database, "Vacuum completed");
            success("Vacuum completed.");
        }
    }

    Ok(())
}
