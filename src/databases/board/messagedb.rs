use chrono::Utc;
use sqlx::SqliteConnection;

use crate::databases::board::message::{Message, NewMessage};

pub async fn insert_message(
    conn: &mut SqliteConnection,
    new_message: &NewMessage,
) -> Result<Message, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (body, username, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        RETURNING id, body, username, created_at, updated_at
        "#,
    )
    .bind(&new_message.body)
    .bind(&new_message.username)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn get_message_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        "SELECT id, body, username, created_at, updated_at FROM messages WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// All messages, oldest first. Rows created within the same instant keep
/// insertion order through the id.
pub async fn list_messages(conn: &mut SqliteConnection) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, body, username, created_at, updated_at
        FROM messages
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await
}

/// Overwrites the body and refreshes `updated_at`. Returns `None` when no row
/// has that id.
pub async fn update_message_body(
    conn: &mut SqliteConnection,
    id: i64,
    body: &str,
) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        UPDATE messages
        SET body = ?1, updated_at = ?2
        WHERE id = ?3
        RETURNING id, body, username, created_at, updated_at
        "#,
    )
    .bind(body)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Returns whether a row was removed.
pub async fn delete_message(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::databases::test_utils::memory_pool;

    fn new_message(body: &str, username: &str) -> NewMessage {
        NewMessage {
            body: body.to_string(),
            username: username.to_string(),
        }
    }

    #[actix_web::test]
    async fn insert_assigns_id_and_timestamps() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let message = insert_message(&mut conn, &new_message("hi", "alice"))
            .await
            .unwrap();

        assert_eq!(message.id, 1);
        assert_eq!(message.body, "hi");
        assert_eq!(message.username, "alice");
        assert_eq!(message.created_at, message.updated_at);
    }

    #[actix_web::test]
    async fn list_returns_messages_in_creation_order() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        for body in ["first", "second", "third"] {
            insert_message(&mut conn, &new_message(body, "bob"))
                .await
                .unwrap();
        }

        let bodies: Vec<String> = list_messages(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, ["first", "second", "third"]);
    }

    #[actix_web::test]
    async fn update_changes_only_body_and_updated_at() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let original = insert_message(&mut conn, &new_message("hi", "alice"))
            .await
            .unwrap();

        let updated = update_message_body(&mut conn, original.id, "bye")
            .await
            .unwrap()
            .expect("message exists");

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.body, "bye");
        assert_eq!(updated.username, original.username);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[actix_web::test]
    async fn update_of_missing_row_returns_none() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let updated = update_message_body(&mut conn, 42, "bye").await.unwrap();

        assert!(updated.is_none());
        assert!(list_messages(&mut conn).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let message = insert_message(&mut conn, &new_message("hi", "alice"))
            .await
            .unwrap();

        assert!(delete_message(&mut conn, message.id).await.unwrap());
        assert!(!delete_message(&mut conn, message.id).await.unwrap());
        assert!(get_message_by_id(&mut conn, message.id)
            .await
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn rolled_back_insert_leaves_no_row() {
        let pool = memory_pool().await;

        let mut tx = pool.begin().await.unwrap();
        insert_message(&mut tx, &new_message("hi", "alice"))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(list_messages(&mut conn).await.unwrap().is_empty());
    }
}
