//! ShipCV Storage
//!
//! `SQLite` database layer for ShipCV.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each table owns its own queries (`users`,
//!   `platform_connections`, `projects`, `resumes`)
//! - **Referential integrity**: foreign keys are enforced by `SQLite` with no
//!   cascades, so children must be removed before their owning user
//! - **Maintenance**: administrative bulk operations live in `maintenance`
//!
//! # Example
//!
//! ```rust,no_run
//! use shipcv_storage::{create_pool, run_migrations};
//! use shipcv_core::UserId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://shipcv.db").await?;
//! run_migrations(&pool).await?;
//!
//! let connections =
//!     shipcv_storage::platform_connections::get_summaries_by_user(&pool, &UserId::new("u1"))
//!         .await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod rows;

// Vertical slices
pub mod platform_connections;
pub mod projects;
pub mod resumes;
pub mod users;

// Administrative operations
pub mod maintenance;

pub use error::StorageError;
pub use maintenance::WipeSummary;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://shipcv.db>`)
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating database pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("Database pool created");

    Ok(pool)
}
