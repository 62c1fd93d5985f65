use anyhow::{Context, Result};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr, time::Duration};

use crate::config::Config;

pub mod company_store;
pub mod purchase_order_store;
pub mod tables;
pub mod user_store;

use tables::{CompanyProfileTable, PurchaseOrderTable, UserTable};

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(config: &Config) -> Result<DbPool> {
    // Create the database file if it doesn't exist
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("invalid DATABASE_URL {}", config.database_url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_pool_size)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .context("failed to connect to the database")?;

    tracing::info!(url = %config.database_url, "Database connected");
    Ok(pool)
}

/// Set up the database schema. Safe to run on every start.
pub async fn setup_database(pool: &DbPool) -> Result<()> {
    let statements = UserTable::create_statements()
        .into_iter()
        .chain(PurchaseOrderTable::create_statements())
        .chain(CompanyProfileTable::create_statements());

    for statement in statements {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .context("failed to create schema")?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}

/// Cheap reachability check used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Closes the pool, giving checked-out connections at most `limit` to be
/// returned. Returns `false` when the limit ran out.
pub async fn close_pool(pool: &DbPool, limit: Duration) -> bool {
    tokio::time::timeout(limit, pool.close()).await.is_ok()
}
