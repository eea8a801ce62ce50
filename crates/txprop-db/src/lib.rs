#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_raw_string_hashes)]
#![allow(clippy::uninlined_format_args)]

extern crate sqlx_core as sqlx;

use sqlx_core::pool::{Pool, PoolOptions};
use sqlx_postgres::{PgConnectOptions, Postgres};
use std::str::FromStr;

pub mod repo;
pub mod services;
pub mod tx;

pub type PgPool = Pool<Postgres>;

/// A REQUIRES_NEW scope holds a second connection while the outer one is
/// suspended.
pub const MIN_POOL_CONNECTIONS: u32 = 2;

pub async fn connect_postgres_with_max(
    path: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx_core::Error> {
    let options = PgConnectOptions::from_str(path)?;
    PoolOptions::new()
        .max_connections(max_connections.max(MIN_POOL_CONNECTIONS))
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &PgPool) -> Result<(), sqlx_core::migrate::MigrateError> {
    sqlx_macros::migrate!("./migrations").run(pool).await
}
