pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod login;
pub mod scan;
pub mod stats;
pub mod verify;

use crate::config::Config;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::models::session::Session;

/// Store over the configured database, schema up to date.
pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    Ok(SqliteStore::new(crate::db::open(cfg)?))
}

/// Session persisted between invocations.
pub(crate) fn load_session() -> AppResult<Session> {
    Session::load(&Config::session_file())
}

pub(crate) fn save_session(session: &Session) -> AppResult<()> {
    session.save(&Config::session_file())
}
