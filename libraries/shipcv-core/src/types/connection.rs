/// Platform connection types
use super::{ConnectionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's linked account on an external platform (GitHub, GitLab, Dev.to, ...)
///
/// Rows are written by the platform sync jobs; one row per user and platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConnection {
    pub id: ConnectionId,
    pub user_id: UserId,

    /// Platform key, e.g. `github`
    pub platform: String,

    /// Account name on the platform (or the raw URL for manual links)
    pub username: String,

    /// When the last sync finished
    pub last_synced: Option<DateTime<Utc>>,

    /// Opaque sync metadata
    pub metadata: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
}

/// Data required to link a platform account
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlatformConnection {
    pub user_id: UserId,
    pub platform: String,
    pub username: String,
    pub last_synced: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

/// Fixed projection served by `GET /api/user/connections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub id: ConnectionId,
    pub platform: String,
    pub username: String,
    pub last_synced: Option<DateTime<Utc>>,
    pub metadata_jsonb: Option<serde_json::Value>,
}

impl From<PlatformConnection> for ConnectionSummary {
    fn from(connection: PlatformConnection) -> Self {
        Self {
            id: connection.id,
            platform: connection.platform,
            username: connection.username,
            last_synced: connection.last_synced,
            metadata_jsonb: connection.metadata,
        }
    }
}

/// Projection served by `GET /api/platforms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSummary {
    pub id: ConnectionId,
    pub platform: String,
    pub username: String,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PlatformConnection> for PlatformSummary {
    fn from(connection: PlatformConnection) -> Self {
        Self {
            id: connection.id,
            platform: connection.platform,
            username: connection.username,
            last_synced: connection.last_synced,
            created_at: connection.created_at,
        }
    }
}
