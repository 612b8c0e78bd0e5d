pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod stats;
pub mod store;

use crate::config::Config;
use crate::errors::AppResult;
use pool::DbPool;
use std::time::Duration;

/// Open the configured database with its busy timeout and bring the schema
/// up to date.
pub fn open(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::with_timeout(&cfg.database, Duration::from_millis(cfg.store_timeout_ms))?;
    initialize::init_db(&pool.conn)?;
    Ok(pool)
}
