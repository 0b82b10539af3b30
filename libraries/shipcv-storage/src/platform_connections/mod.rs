//! Linked platform accounts
//!
//! Rows are keyed by `(user_id, platform)`. Sync jobs upsert them and bump
//! `last_synced`; the API only reads and disconnects.

use crate::rows::{json_text, now, optional_json, optional_timestamp, timestamp};
use crate::Result;
use shipcv_core::types::{
    ConnectionId, ConnectionSummary, NewPlatformConnection, PlatformConnection, PlatformSummary,
    UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn map_connection(row: &SqliteRow) -> Result<PlatformConnection> {
    Ok(PlatformConnection {
        id: ConnectionId::new(row.try_get::<String, _>("id")?),
        user_id: UserId::new(row.try_get::<String, _>("user_id")?),
        platform: row.try_get("platform")?,
        username: row.try_get("username")?,
        last_synced: optional_timestamp(row.try_get("last_synced")?)?,
        metadata: optional_json(row.try_get("metadata_jsonb")?)?,
        created_at: timestamp(row.try_get("created_at")?)?,
    })
}

/// Link a platform account, or update the existing link for that platform
pub async fn upsert(pool: &SqlitePool, connection: NewPlatformConnection) -> Result<PlatformConnection> {
    let id = ConnectionId::generate();
    let last_synced = connection.last_synced.map(|t| t.timestamp());

    let row = sqlx::query(
        "INSERT INTO platform_connections
             (id, user_id, platform, username, last_synced, metadata_jsonb, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id, platform) DO UPDATE SET
             username = excluded.username,
             last_synced = COALESCE(excluded.last_synced, platform_connections.last_synced),
             metadata_jsonb = COALESCE(excluded.metadata_jsonb, platform_connections.metadata_jsonb)
         RETURNING id, user_id, platform, username, last_synced, metadata_jsonb, created_at",
    )
    .bind(id.as_str())
    .bind(connection.user_id.as_str())
    .bind(&connection.platform)
    .bind(&connection.username)
    .bind(last_synced)
    .bind(json_text(connection.metadata.as_ref())?)
    .bind(now())
    .fetch_one(pool)
    .await?;

    map_connection(&row)
}

/// Get all connections owned by a user, oldest first
pub async fn get_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<PlatformConnection>> {
    let rows = sqlx::query(
        "SELECT id, user_id, platform, username, last_synced, metadata_jsonb, created_at
         FROM platform_connections
         WHERE user_id = ?
         ORDER BY created_at ASC, rowid ASC",
    )
    .bind(user_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_connection).collect()
}

/// Connection projection served to the owner: id, platform, username,
/// last sync time and metadata
pub async fn get_summaries_by_user(
    pool: &SqlitePool,
    user_id: &UserId,
) -> Result<Vec<ConnectionSummary>> {
    let connections = get_by_user(pool, user_id).await?;
    Ok(connections.into_iter().map(ConnectionSummary::from).collect())
}

/// Platform list for the platforms page, newest link first
pub async fn get_platform_summaries(
    pool: &SqlitePool,
    user_id: &UserId,
) -> Result<Vec<PlatformSummary>> {
    let mut connections = get_by_user(pool, user_id).await?;
    connections.reverse();
    Ok(connections.into_iter().map(PlatformSummary::from).collect())
}

/// Disconnect a platform
///
/// Returns `false` if the user had no connection for that platform.
pub async fn delete(pool: &SqlitePool, user_id: &UserId, platform: &str) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM platform_connections WHERE user_id = ? AND platform = ?")
            .bind(user_id.as_str())
            .bind(platform)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
