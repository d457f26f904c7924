//! Append-only chat transcript operations.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ChatMessage;

/// Append a message to a client's transcript.
pub async fn append(pool: &SqlitePool, client_id: &str, role: &str, content: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_messages (client_id, role, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(client_id)
    .bind(role)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(())
}

/// The conversational transcript used for AI grounding: user and assistant
/// rows only, in chronological order. System rows are excluded.
pub async fn history_for_client(pool: &SqlitePool, client_id: &str) -> Result<Vec<ChatMessage>> {
    let messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, client_id, role, content, read, created_at
        FROM chat_messages
        WHERE client_id = ? AND role IN ('user', 'assistant')
        ORDER BY created_at, id
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Count messages logged for a client.
pub async fn count_for_client(pool: &SqlitePool, client_id: &str) -> Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_messages WHERE client_id = ?")
            .bind(client_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
