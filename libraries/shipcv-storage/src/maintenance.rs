//! Administrative bulk operations
//!
//! These are meant for manual use against a development or staging database.
//! They are not safe to run concurrently with a live server.

use crate::{Result, StorageError};
use serde::Serialize;
use sqlx::SqlitePool;

/// Tables in the order they must be emptied: children before parents
pub const WIPE_ORDER: [&str; 4] = ["resumes", "projects", "platform_connections", "users"];

/// Rows removed per table by [`wipe_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WipeSummary {
    pub resumes: u64,
    pub projects: u64,
    pub platform_connections: u64,
    pub users: u64,
}

impl WipeSummary {
    pub fn total(&self) -> u64 {
        self.resumes + self.projects + self.platform_connections + self.users
    }
}

/// Delete every row from every table
///
/// Tables are emptied one statement at a time in [`WIPE_ORDER`]. The first
/// failing delete aborts the wipe and is returned; tables emptied before it
/// stay empty.
pub async fn wipe_all(pool: &SqlitePool) -> Result<WipeSummary> {
    let mut summary = WipeSummary::default();

    for table in WIPE_ORDER {
        tracing::info!("Deleting {}...", table.replace('_', " "));

        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(pool)
            .await?
            .rows_affected();

        match table {
            "resumes" => summary.resumes = deleted,
            "projects" => summary.projects = deleted,
            "platform_connections" => summary.platform_connections = deleted,
            _ => summary.users = deleted,
        }
    }

    Ok(summary)
}

/// Number of rows in a table from [`WIPE_ORDER`]
pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64> {
    if !WIPE_ORDER.contains(&table) {
        return Err(StorageError::InvalidData(format!("unknown table {table}")));
    }

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;

    Ok(count)
}
