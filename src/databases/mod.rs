use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Executor, SqlitePool};

use crate::config::Config;

pub mod board;
#[cfg(test)]
pub mod test_utils;

const SCHEMA_SQL: &str = include_str!("board/schema.sql");

const REQUIRED_TABLES: [&str; 1] = [
    "messages",
    // Add other expected table names here
];

async fn check_tables_exist(pool: &SqlitePool, tables: &[&str]) -> Result<bool> {
    for &table in tables {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(table)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to look up table '{}'", table))?;

        if count == 0 {
            info!("Table '{}' does not exist.", table);
            return Ok(false);
        }
    }
    Ok(true)
}

/// Opens the pool described by `config`.
///
/// Connections are never recycled for idleness or age: an in-memory database
/// lives exactly as long as its connection.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to database at {}", config.database_url))
}

/// Connects to the database and creates any missing tables.
pub async fn setup_backend(config: &Config) -> Result<SqlitePool> {
    let pool = connect(config).await?;

    let tables_exist = check_tables_exist(&pool, &REQUIRED_TABLES).await?;

    if !tables_exist {
        info!("Some tables missing. Running schema SQL to create tables...");
        pool.execute(SCHEMA_SQL)
            .await
            .context("Failed to execute schema SQL")?;
        info!("Schema SQL executed successfully.");
    } else {
        info!("All required tables exist.");
    }

    Ok(pool)
}
