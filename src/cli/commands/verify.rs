use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{SystemClock, TimeSource};
use crate::core::validator::TokenValidator;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::time::describe_epoch;

/// Dry run of the validator: nothing is read or written.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Verify {
        payload,
        session_id,
    } = cmd
    {
        let validator = TokenValidator::from_config(cfg);
        let now = SystemClock.epoch_seconds();

        let token = validator
            .check(payload, session_id.as_deref(), now)
            .map_err(AppError::InvalidToken)?;

        success(format!(
            "Valid token: class {}, teacher {}, issued {} ({}s ago, window {}s)",
            token.class_id,
            token.teacher_id,
            describe_epoch(token.issued_at),
            token.age(now),
            validator.window_secs
        ));
    }

    Ok(())
}
