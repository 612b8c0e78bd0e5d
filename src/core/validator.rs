//! Session QR token validation.
//!
//! Validation is a total function of its inputs: malformed, foreign,
//! mismatched and expired payloads all come back as a [`Rejection`], never
//! as an error or a panic. No state is kept between calls.

use crate::config::Config;
pub use crate::models::token::{Rejection, SessionToken};

/// Canonical freshness window, in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 10;

/// Structural parse plus the optional session-id comparison and the
/// freshness check.
///
/// A `session_id` of `None` skips the class comparison, so the token is
/// accepted for any session.
pub fn check(
    token: &str,
    session_id: Option<&str>,
    now: i64,
    window: u64,
) -> Result<SessionToken, Rejection> {
    let parsed = SessionToken::parse(token)?;

    if let Some(expected) = session_id
        && parsed.class_id != expected
    {
        return Err(Rejection::SessionMismatch);
    }

    let age_secs = parsed.age(now);
    if age_secs > window {
        return Err(Rejection::Expired { age_secs });
    }

    Ok(parsed)
}

/// Boolean form of [`check`].
pub fn validate(token: &str, session_id: Option<&str>, now: i64, window: u64) -> bool {
    check(token, session_id, now, window).is_ok()
}

/// Validator bound to the configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenValidator {
    pub window_secs: u64,
    /// When set, a session id must be supplied and must match field 1.
    /// When clear, field 1 is never compared.
    pub enforce_session_id: bool,
}

impl Default for TokenValidator {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
            enforce_session_id: true,
        }
    }
}

impl TokenValidator {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            window_secs: cfg.freshness_window_secs,
            enforce_session_id: cfg.enforce_session_id,
        }
    }

    pub fn check(
        &self,
        token: &str,
        session_id: Option<&str>,
        now: i64,
    ) -> Result<SessionToken, Rejection> {
        if !self.enforce_session_id {
            return check(token, None, now, self.window_secs);
        }

        // Structural problems are reported before a missing session id.
        SessionToken::parse(token)?;

        match session_id {
            Some(id) if !id.trim().is_empty() => check(token, Some(id), now, self.window_secs),
            _ => Err(Rejection::SessionMissing),
        }
    }

    pub fn validate(&self, token: &str, session_id: Option<&str>, now: i64) -> bool {
        self.check(token, session_id, now).is_ok()
    }
}
