pub mod models;

use crate::infrastructure::config::DbConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;

pub type DbPool = Pool<Postgres>;

/// Unique-violation SQLSTATE.
pub const UNIQUE_VIOLATION: &str = "23505";
/// Foreign-key-violation SQLSTATE.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Integer overflow in arithmetic, e.g. `total + $2` past `BIGINT`.
pub const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

fn connect_options(database_url: &str, config: &DbConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let statement_timeout = format!("{}s", config.statement_timeout_secs);
    Ok(PgConnectOptions::from_str(database_url)?
        .options([("statement_timeout", statement_timeout.as_str())]))
}

pub async fn create_pool(database_url: &str, config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(connect_options(database_url, config)?)
        .await
}

/// Pool that opens no connection until first use.
pub fn create_lazy_pool(database_url: &str, config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(connect_options(database_url, config)?))
}

/// SQLSTATE and constraint name of a database error, if it is one.
pub fn constraint_violation(err: &sqlx::Error) -> Option<(String, Option<String>)> {
    match err {
        sqlx::Error::Database(db_err) => Some((
            db_err.code()?.into_owned(),
            db_err.constraint().map(str::to_string),
        )),
        _ => None,
    }
}
