//! Client CRUD operations.

use intake_core::ClientProfile;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::Client;

const CLIENT_COLUMNS: &str = "id, phone, name, age, gender, height, weight, goal, \
     experience, available_days, health_conditions, exercise_preferences, \
     dietary_restrictions, equipment, motivation, paid, plan_url, plan_text, \
     ai_enabled, created_at, updated_at";

/// Get a client by id.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Client> {
    let query = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?");
    sqlx::query_as::<_, Client>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Client",
            id: id.to_string(),
        })
}

/// Find a client by phone number.
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<Client>> {
    let query = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE phone = ?");
    let client = sqlx::query_as::<_, Client>(&query)
        .bind(phone)
        .fetch_optional(pool)
        .await?;

    Ok(client)
}

/// Find the client owning a phone number, creating the row on first contact.
pub async fn find_or_create_by_phone(pool: &SqlitePool, phone: &str) -> Result<Client> {
    if let Some(existing) = find_by_phone(pool, phone).await? {
        return Ok(existing);
    }

    let id = Uuid::new_v4().to_string();
    // A concurrent insert for the same phone loses the race harmlessly.
    sqlx::query(
        r#"
        INSERT INTO clients (id, phone)
        VALUES (?, ?)
        ON CONFLICT(phone) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(phone)
    .execute(pool)
    .await?;

    tracing::debug!(phone, "created client on first contact");

    find_by_phone(pool, phone).await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "Client",
        id: phone.to_string(),
    })
}

/// Copy a profile draft onto the client row.
pub async fn apply_profile(pool: &SqlitePool, id: &str, profile: &ClientProfile) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE clients
        SET name = ?, age = ?, gender = ?, height = ?, weight = ?, goal = ?,
            experience = ?, available_days = ?, health_conditions = ?,
            exercise_preferences = ?, dietary_restrictions = ?, equipment = ?,
            motivation = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&profile.name)
    .bind(&profile.age)
    .bind(&profile.gender)
    .bind(&profile.height)
    .bind(&profile.weight)
    .bind(&profile.goal)
    .bind(&profile.experience)
    .bind(&profile.available_days)
    .bind(&profile.health_conditions)
    .bind(&profile.exercise_preferences)
    .bind(&profile.dietary_restrictions)
    .bind(&profile.equipment)
    .bind(&profile.motivation)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Client",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Store the latest generated plan text.
pub async fn set_plan_text(pool: &SqlitePool, id: &str, plan_text: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE clients
        SET plan_text = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(plan_text)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Client",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Mark a client as paid and record the public plan URL.
pub async fn mark_paid(pool: &SqlitePool, id: &str, plan_url: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE clients
        SET paid = 1, plan_url = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(plan_url)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Client",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Toggle whether the bot responds to this client.
pub async fn set_ai_enabled(pool: &SqlitePool, id: &str, enabled: bool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE clients
        SET ai_enabled = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(enabled)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Client",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count total clients.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
