use crate::core::clock::TimeSource;
use crate::core::recorder::{AttendanceRecorder, MarkOutcome};
use crate::core::validator::{Rejection, SessionToken, TokenValidator};
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::store::RecordStore;

/// Result of one scan interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub token: SessionToken,
    pub outcome: MarkOutcome,
    /// Payloads seen before the accepted one, with the reason they failed.
    pub rejected: Vec<(String, Rejection)>,
}

/// One pass through validator then recorder.
pub struct ScanLogic;

impl ScanLogic {
    /// The first payload that validates is recorded; the rest are ignored.
    /// When none validates, the last rejection is returned as
    /// `AppError::InvalidToken`.
    pub fn scan<S: RecordStore, C: TimeSource>(
        session: &Session,
        payloads: &[String],
        session_id: Option<&str>,
        validator: &TokenValidator,
        recorder: &AttendanceRecorder<S, C>,
        now: i64,
    ) -> AppResult<ScanReport> {
        let student = session.require_student()?;

        if payloads.is_empty() {
            return Err(AppError::NoQrCode);
        }

        let mut rejected = Vec::new();
        for payload in payloads {
            match validator.check(payload, session_id, now) {
                Ok(token) => {
                    let outcome = recorder.mark(student)?;
                    return Ok(ScanReport {
                        token,
                        outcome,
                        rejected,
                    });
                }
                Err(reason) => rejected.push((payload.clone(), reason)),
            }
        }

        match rejected.pop() {
            Some((_, reason)) => Err(AppError::InvalidToken(reason)),
            None => Err(AppError::NoQrCode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::recorder::RetryPolicy;
    use crate::models::attendance::ATTENDANCE_TABLE;
    use crate::store::memory::MemoryStore;

    const NOW: i64 = 1_700_000_000;

    fn recorder(store: &MemoryStore) -> AttendanceRecorder<&MemoryStore, FixedClock> {
        AttendanceRecorder::with_clock(store, FixedClock::at("2024-03-04 09:00:00", NOW).unwrap())
            .retry(RetryPolicy::NONE)
    }

    fn alice() -> Session {
        Session::logged_in_as("ALICE".into())
    }

    #[test]
    fn valid_scan_marks_once() {
        let store = MemoryStore::new();
        let rec = recorder(&store);
        let payloads = vec![format!("SESSION:MATH:T1:{}", NOW - 3)];
        let v = TokenValidator::default();

        let first = ScanLogic::scan(&alice(), &payloads, Some("MATH"), &v, &rec, NOW).unwrap();
        assert!(first.outcome.is_new());
        assert_eq!(first.token.class_id, "MATH");

        let second = ScanLogic::scan(&alice(), &payloads, Some("MATH"), &v, &rec, NOW).unwrap();
        assert!(!second.outcome.is_new());
        assert_eq!(store.rows(ATTENDANCE_TABLE).len(), 1);
    }

    #[test]
    fn logged_out_session_is_refused_before_validation() {
        let store = MemoryStore::new();
        let err = ScanLogic::scan(
            &Session::default(),
            &["SESSION:MATH:T1:0".to_string()],
            Some("MATH"),
            &TokenValidator::default(),
            &recorder(&store),
            NOW,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotLoggedIn));
        assert_eq!(store.query_calls(), 0);
    }

    #[test]
    fn invalid_payload_never_touches_the_store() {
        let store = MemoryStore::new();
        let err = ScanLogic::scan(
            &alice(),
            &[format!("SESSION:MATH:T1:{}", NOW - 60)],
            Some("MATH"),
            &TokenValidator::default(),
            &recorder(&store),
            NOW,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidToken(Rejection::Expired { age_secs: 60 })
        ));
        assert_eq!(store.query_calls(), 0);
        assert_eq!(store.insert_calls(), 0);
    }

    #[test]
    fn first_valid_payload_wins() {
        let store = MemoryStore::new();
        let payloads = vec![
            "https://example.com".to_string(),
            format!("SESSION:OTHER:T1:{NOW}"),
            format!("SESSION:MATH:T1:{NOW}"),
            format!("SESSION:MATH:T2:{NOW}"),
        ];
        let report = ScanLogic::scan(
            &alice(),
            &payloads,
            Some("MATH"),
            &TokenValidator::default(),
            &recorder(&store),
            NOW,
        )
        .unwrap();

        assert_eq!(report.token.teacher_id, "T1");
        assert_eq!(
            report.rejected,
            vec![
                (payloads[0].clone(), Rejection::TooFewFields),
                (payloads[1].clone(), Rejection::SessionMismatch),
            ]
        );
        assert_eq!(store.insert_calls(), 1);
    }

    #[test]
    fn no_payloads() {
        let store = MemoryStore::new();
        let err = ScanLogic::scan(
            &alice(),
            &[],
            Some("MATH"),
            &TokenValidator::default(),
            &recorder(&store),
            NOW,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NoQrCode));
    }
}
