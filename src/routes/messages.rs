use actix_web::{delete, get, patch, post, web, HttpResponse};
use log::{info, warn};
use serde::Deserialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::databases::board::message::{Message, NewMessage};
use crate::databases::board::messagedb::{
    delete_message as delete_message_row, get_message_by_id, insert_message, list_messages,
    update_message_body,
};
use crate::error::ApiError;

pub const MESSAGE_NOT_FOUND: &str = "Message not found";

#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    pub body: Option<String>,
    pub username: Option<String>,
}

impl CreateMessage {
    pub fn validate(self) -> Result<NewMessage, ApiError> {
        match (non_empty(self.body), non_empty(self.username)) {
            (Some(body), Some(username)) => Ok(NewMessage { body, username }),
            _ => Err(ApiError::Validation("Both body and username are required")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessage {
    pub body: Option<String>,
}

impl UpdateMessage {
    /// An empty request body counts as an object without `body`.
    pub fn from_slice(payload: &[u8]) -> Result<Self, ApiError> {
        if payload.is_empty() {
            return Ok(Self { body: None });
        }
        serde_json::from_slice(payload).map_err(|e| ApiError::Payload(e.to_string()))
    }

    /// Only a missing body is rejected; an empty string is a valid new body.
    pub fn validate(self) -> Result<String, ApiError> {
        self.body.ok_or(ApiError::Validation("Body is required"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Commits on success. On failure the transaction is rolled back before the
/// error is handed back to the caller.
async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn apply_update(
    conn: &mut SqliteConnection,
    id: i64,
    payload: &[u8],
) -> Result<Message, ApiError> {
    if get_message_by_id(&mut *conn, id).await?.is_none() {
        return Err(ApiError::NotFound(MESSAGE_NOT_FOUND));
    }

    let body = UpdateMessage::from_slice(payload)?.validate()?;

    update_message_body(conn, id, &body)
        .await?
        .ok_or(ApiError::NotFound(MESSAGE_NOT_FOUND))
}

async fn apply_delete(conn: &mut SqliteConnection, id: i64) -> Result<(), ApiError> {
    if delete_message_row(conn, id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(MESSAGE_NOT_FOUND))
    }
}

#[get("/messages")]
pub async fn get_messages(db_pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let mut conn = db_pool.acquire().await?;
    let messages = list_messages(&mut conn).await?;

    Ok(HttpResponse::Ok().json(messages))
}

#[post("/messages")]
pub async fn create_message(
    db_pool: web::Data<SqlitePool>,
    payload: web::Json<CreateMessage>,
) -> Result<HttpResponse, ApiError> {
    let new_message = payload.into_inner().validate()?;

    let mut tx = db_pool.begin().await?;
    let result = insert_message(&mut tx, &new_message)
        .await
        .map_err(ApiError::from);
    let message = finish(tx, result).await?;

    info!("Created message {} by {}", message.id, message.username);
    Ok(HttpResponse::Created().json(message))
}

#[patch("/messages/{id}")]
pub async fn update_message(
    db_pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    // The body is parsed only after the id is known to exist.
    let mut tx = db_pool.begin().await?;
    let result = apply_update(&mut tx, id, &payload).await;
    let message = finish(tx, result).await?;

    Ok(HttpResponse::Ok().json(message))
}

#[delete("/messages/{id}")]
pub async fn delete_message(
    db_pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let mut tx = db_pool.begin().await?;
    let result = apply_delete(&mut tx, id).await;
    finish(tx, result).await?;

    info!("Deleted message {}", id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_messages);
    cfg.service(create_message);
    cfg.service(update_message);
    cfg.service(delete_message);
}
