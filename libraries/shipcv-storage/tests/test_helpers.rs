//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using real `SQLite` files (not
//! in-memory) so migrations, foreign keys and indexes behave as in production.

#![allow(dead_code)]

use shipcv_core::types::*;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = shipcv_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        shipcv_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a test user
pub async fn create_test_user(pool: &SqlitePool, email: &str) -> User {
    shipcv_storage::users::create(pool, NewUser::new(email).with_name("Test User"))
        .await
        .expect("Failed to create test user")
}

/// Test fixture: Link a platform for a user
pub async fn create_test_connection(
    pool: &SqlitePool,
    user_id: &UserId,
    platform: &str,
    username: &str,
) -> PlatformConnection {
    shipcv_storage::platform_connections::upsert(
        pool,
        NewPlatformConnection {
            user_id: user_id.clone(),
            platform: platform.to_string(),
            username: username.to_string(),
            last_synced: None,
            metadata: None,
        },
    )
    .await
    .expect("Failed to create test connection")
}

/// Test fixture: Create a project for a user
pub async fn create_test_project(pool: &SqlitePool, user_id: &UserId, name: &str) -> Project {
    shipcv_storage::projects::create(
        pool,
        NewProject {
            user_id: user_id.clone(),
            platform: "github".to_string(),
            external_id: format!("ext-{name}"),
            name: name.to_string(),
            description: None,
            url: format!("https://github.com/test/{name}"),
        },
    )
    .await
    .expect("Failed to create test project")
}

/// Test fixture: Create a resume for a user
pub async fn create_test_resume(pool: &SqlitePool, user_id: &UserId, title: &str) -> Resume {
    shipcv_storage::resumes::create(
        pool,
        NewResume {
            user_id: user_id.clone(),
            title: title.to_string(),
            target_role: None,
            template_id: "modern".to_string(),
            latex_content: "\\documentclass{article}".to_string(),
        },
    )
    .await
    .expect("Failed to create test resume")
}

/// Test fixture: A user owning one row in every other table
pub async fn create_populated_user(pool: &SqlitePool, email: &str) -> User {
    let user = create_test_user(pool, email).await;
    create_test_connection(pool, &user.id, "github", "octocat").await;
    create_test_project(pool, &user.id, "shipcv").await;
    create_test_resume(pool, &user.id, "Backend resume").await;
    user
}
