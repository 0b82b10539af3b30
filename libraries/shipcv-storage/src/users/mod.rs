//! User accounts and credentials

use crate::rows::{json_text, now, optional_json, timestamp};
use crate::{Result, StorageError};
use shipcv_core::types::{NewUser, User, UserId, DEFAULT_OPENAI_CREDITS};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str =
    "id, email, name, target_role, job_description_jsonb, openai_credits, created_at";

fn map_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: UserId::new(row.try_get::<String, _>("id")?),
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        target_role: row.try_get("target_role")?,
        job_description: optional_json(row.try_get("job_description_jsonb")?)?,
        openai_credits: row.try_get("openai_credits")?,
        created_at: timestamp(row.try_get("created_at")?)?,
    })
}

/// Create a user
///
/// New accounts start with the default AI credit allowance.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let id = UserId::generate();
    let created_at = now();

    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash, openai_credits, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(DEFAULT_OPENAI_CREDITS)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(User {
        id,
        email: user.email,
        name: user.name,
        target_role: None,
        job_description: None,
        openai_credits: DEFAULT_OPENAI_CREDITS,
        created_at: timestamp(created_at)?,
    })
}

/// Get a user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_user).transpose()
}

/// Find a user by email, ignoring case
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_user).transpose()
}

/// Get user's password hash for authentication
///
/// Returns `None` when the user does not exist or signed up without a
/// password (OAuth accounts).
pub async fn get_password_hash(pool: &SqlitePool, id: &UserId) -> Result<Option<String>> {
    let hash: Option<Option<String>> =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(pool)
            .await?;

    Ok(hash.flatten())
}

/// Set the role the user is targeting along with its job description
pub async fn set_target_role(
    pool: &SqlitePool,
    id: &UserId,
    target_role: Option<&str>,
    job_description: Option<&serde_json::Value>,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE users SET target_role = ?, job_description_jsonb = ? WHERE id = ?",
    )
    .bind(target_role)
    .bind(json_text(job_description)?)
    .bind(id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.as_str()));
    }
    Ok(())
}

/// Strip personal data from a user, keeping the row and its owned records
///
/// The email is replaced with `deleted+<id>@example.invalid` so the unique
/// constraint still holds. Returns the new email.
pub async fn anonymize(pool: &SqlitePool, id: &UserId) -> Result<String> {
    let anonymized_email = format!("deleted+{}@example.invalid", id);

    let result = sqlx::query(
        "UPDATE users
         SET email = ?, name = NULL, password_hash = NULL,
             target_role = NULL, job_description_jsonb = NULL
         WHERE id = ?",
    )
    .bind(&anonymized_email)
    .bind(id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.as_str()));
    }
    Ok(anonymized_email)
}

/// Delete a user and everything they own in one transaction
///
/// Returns `false` if the user did not exist.
pub async fn delete_with_data(pool: &SqlitePool, id: &UserId) -> Result<bool> {
    let mut tx = pool.begin().await?;

    for table in ["resumes", "projects", "platform_connections"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ?"))
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}
