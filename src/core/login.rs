use crate::errors::{AppError, AppResult};
use crate::models::attendance::normalize_name;
use crate::models::session::Session;
use crate::store::RecordStore;

pub const STUDENTS_TABLE: &str = "students_data";
pub const COL_STUDENT_NAME: &str = "Name";
pub const COL_PARENT_GMAIL: &str = "Parent_Gmail";

/// Login / logout handlers. Both take the current session and return the
/// next one; nothing is kept globally.
pub struct LoginLogic;

impl LoginLogic {
    /// Look the pair up in `students_data` exactly as typed (trimmed). On
    /// success the session carries the uppercase name used by the recorder.
    pub fn login<S: RecordStore>(
        _session: Session,
        name: &str,
        parent_email: &str,
        store: &S,
    ) -> AppResult<Session> {
        let name = name.trim();
        let parent_email = parent_email.trim();

        if name.is_empty() || parent_email.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        let found = store.query(
            STUDENTS_TABLE,
            &[(COL_STUDENT_NAME, name), (COL_PARENT_GMAIL, parent_email)],
        )?;

        if found.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        Ok(Session::logged_in_as(normalize_name(name)))
    }

    pub fn logout(_session: Session) -> Session {
        Session::default()
    }
}
