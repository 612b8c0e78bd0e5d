use serde::Serialize;
use std::fmt;

/// Literal tag carried in field 0 of every session token.
pub const SESSION_TAG: &str = "SESSION";

/// Decoded classroom QR payload: `SESSION:<class_id>:<teacher_id>:<issued_at>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    pub class_id: String,
    pub teacher_id: String, // carried, never checked
    pub issued_at: i64,     // unix seconds
}

/// Why a payload was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rejection {
    TooFewFields,
    WrongKind,
    SessionMissing,
    SessionMismatch,
    BadTimestamp,
    Expired { age_secs: u64 },
}

impl Rejection {
    /// Short stable code, used in the internal log table.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::TooFewFields => "too_few_fields",
            Rejection::WrongKind => "wrong_kind",
            Rejection::SessionMissing => "session_missing",
            Rejection::SessionMismatch => "session_mismatch",
            Rejection::BadTimestamp => "bad_timestamp",
            Rejection::Expired { .. } => "expired",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooFewFields => write!(f, "payload is not a session token"),
            Rejection::WrongKind => write!(f, "payload is not a SESSION token"),
            Rejection::SessionMissing => write!(f, "no session id was given"),
            Rejection::SessionMismatch => write!(f, "token belongs to another session"),
            Rejection::BadTimestamp => write!(f, "token timestamp is not a number"),
            Rejection::Expired { age_secs } => write!(f, "token is {age_secs}s old"),
        }
    }
}

impl SessionToken {
    /// Structural parse (field count, tag, timestamp). Never panics.
    ///
    /// Fields past the fourth are ignored. The timestamp tolerates
    /// surrounding whitespace, nothing else.
    pub fn parse(raw: &str) -> Result<Self, Rejection> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() < 4 {
            return Err(Rejection::TooFewFields);
        }

        if parts[0] != SESSION_TAG {
            return Err(Rejection::WrongKind);
        }

        let issued_at = parts[3]
            .trim()
            .parse::<i64>()
            .map_err(|_| Rejection::BadTimestamp)?;

        Ok(Self {
            class_id: parts[1].to_string(),
            teacher_id: parts[2].to_string(),
            issued_at,
        })
    }

    /// Absolute distance between `now` and the issue time, in seconds.
    pub fn age(&self, now: i64) -> u64 {
        now.abs_diff(self.issued_at)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            SESSION_TAG, self.class_id, self.teacher_id, self.issued_at
        )
    }
}
