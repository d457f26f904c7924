//! Conversation CRUD operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::Conversation;

/// Get a conversation by id.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, client_id, state, context, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Conversation",
        id: id.to_string(),
    })
}

/// Create a conversation for a client and return the stored row.
pub async fn create(
    pool: &SqlitePool,
    client_id: &str,
    state: &str,
    context: &str,
) -> Result<Conversation> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO conversations (id, client_id, state, context)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(client_id)
    .bind(state)
    .bind(context)
    .execute(pool)
    .await?;

    tracing::debug!(client_id, state, "created conversation");

    get(pool, &id).await
}

/// The active conversation for a client: the most recently created row.
pub async fn latest_for_client(
    pool: &SqlitePool,
    client_id: &str,
) -> Result<Option<Conversation>> {
    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, client_id, state, context, created_at, updated_at
        FROM conversations
        WHERE client_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(conversation)
}

/// Advance a conversation's state.
pub async fn update_state(pool: &SqlitePool, id: &str, state: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET state = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(state)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Persist a conversation's context draft.
pub async fn update_context(pool: &SqlitePool, id: &str, context: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET context = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(context)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}
