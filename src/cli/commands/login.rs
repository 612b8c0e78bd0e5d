use super::{load_session, open_store, save_session};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::login::LoginLogic;
use crate::core::recorder::{AttendanceRecorder, RetryPolicy};
use crate::db::log::LogOp;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

/// Handles `login`, `logout` and `whoami`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Login { name, email } => {
            let store = open_store(cfg)?;
            let session = load_session()?;

            match LoginLogic::login(session, name, email, &store) {
                Ok(next) => {
                    save_session(&next)?;
                    let student = next.require_student()?;
                    store.log(LogOp::Login, student, "Logged in");
                    success(format!("Logged in as {student}"));
                    Ok(())
                }
                Err(e @ AppError::InvalidCredentials) => {
                    store.log(LogOp::Login, name.trim(), "Invalid credentials");
                    Err(e)
                }
                Err(e) => Err(e),
            }
        }

        Commands::Logout => {
            let session = load_session()?;
            let who = session.student_name.clone();
            save_session(&LoginLogic::logout(session))?;

            match who {
                Some(name) => {
                    open_store(cfg)?.log(LogOp::Logout, &name, "Logged out");
                    success(format!("Logged out ({name})"));
                }
                None => info("Nobody was logged in."),
            }
            Ok(())
        }

        Commands::Whoami => {
            let session = load_session()?;
            let Ok(name) = session.require_student() else {
                info("Not logged in.");
                return Ok(());
            };
            println!("{name}");

            let store = open_store(cfg)?;
            let recorder = AttendanceRecorder::new(&store).retry(RetryPolicy::from_config(cfg));
            match recorder.todays_record(name)? {
                Some(rec) => info(format!(
                    "Marked today ({}) at {} via {}",
                    rec.date, rec.time, rec.method
                )),
                None => info("Not marked today."),
            }
            Ok(())
        }

        _ => Ok(()),
    }
}
