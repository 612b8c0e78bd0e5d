use super::{load_session, open_store};
use crate::cli::parser::{Commands, PayloadSource};
use crate::config::Config;
use crate::core::clock::{SystemClock, TimeSource};
use crate::core::recorder::{AttendanceRecorder, MarkOutcome, RetryPolicy};
use crate::core::scan::ScanLogic;
use crate::core::validator::TokenValidator;
use crate::db::log::LogOp;
use crate::decode::{QrDecoder, TextPayloadDecoder, read_source};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};

fn collect_payloads(source: &PayloadSource) -> AppResult<Vec<String>> {
    match &source.payload_file {
        Some(path) => Ok(TextPayloadDecoder.decode(&read_source(path)?)),
        None => Ok(source.payloads.clone()),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { session_id, source } = cmd {
        let session = load_session()?;
        let student = session.require_student()?.to_string();
        let payloads = collect_payloads(source)?;

        let store = open_store(cfg)?;
        let recorder = AttendanceRecorder::new(&store)
            .method(cfg.method_label.clone())
            .retry(RetryPolicy::from_config(cfg));
        let validator = TokenValidator::from_config(cfg);
        let now = SystemClock.epoch_seconds();

        match ScanLogic::scan(
            &session,
            &payloads,
            session_id.as_deref(),
            &validator,
            &recorder,
            now,
        ) {
            Ok(report) => match report.outcome {
                MarkOutcome::Marked(rec) => {
                    store.log(
                        LogOp::Marked,
                        &rec.name,
                        &format!("{} {} via {} ({})", rec.date, rec.time, rec.method, report.token.class_id),
                    );
                    success(format!(
                        "Attendance marked for {} on {} at {}",
                        rec.name, rec.date, rec.time
                    ));
                }
                MarkOutcome::AlreadyMarked { name, date } => {
                    store.log(LogOp::Duplicate, &name, &format!("already marked on {date}"));
                    warning(format!("Attendance already marked today ({date})."));
                }
            },
            Err(e @ AppError::InvalidToken(_)) | Err(e @ AppError::NoQrCode) => {
                store.log(LogOp::Rejected, &student, &e.to_string());
                return Err(e);
            }
            Err(e) if e.is_store_failure() => {
                store.log(LogOp::StoreError, &student, &e.to_string());
                return Err(e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
