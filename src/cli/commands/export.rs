use super::{load_session, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::LogOp;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let session = load_session()?;
        let student = session.require_student()?;

        let store = open_store(cfg)?;
        let written = store.with_conn(|conn| {
            ExportLogic::export(conn, student, *format, file, range.as_deref(), *force)
        })?;

        if written > 0 {
            store.log(
                LogOp::Export,
                file,
                &format!("{written} record(s) of {student} as {}", format.as_str()),
            );
        }
    }
    Ok(())
}
