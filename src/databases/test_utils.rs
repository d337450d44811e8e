use sqlx::SqlitePool;

use crate::config::Config;
use crate::databases::setup_backend;

pub async fn memory_pool() -> SqlitePool {
    setup_backend(&Config::in_memory())
        .await
        .expect("Failed to create in-memory SQLite database")
}
