use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single board post as stored in the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub body: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated message that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub body: String,
    pub username: String,
}
