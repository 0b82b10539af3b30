/// Shared application state
use crate::services::{AuthService, Cache, ObjectStorageClient};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub cache: Cache,
    /// Absent when object storage credentials are not configured
    pub object_storage: Option<Arc<ObjectStorageClient>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        auth_service: Arc<AuthService>,
        cache: Cache,
        object_storage: Option<Arc<ObjectStorageClient>>,
    ) -> Self {
        Self {
            db,
            auth_service,
            cache,
            object_storage,
        }
    }
}
