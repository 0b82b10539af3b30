//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use shipcv_core::{NewPlatformConnection, NewUser, User};
use shipcv_server::{
    create_router,
    services::{cache::MemoryBackend, AuthService, Cache},
    state::AppState,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Router plus handles on everything behind it
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub cache: Cache,
    pub web_dir: TempDir,
    _db_dir: TempDir,
}

impl TestApp {
    /// App with a migrated database and an in-memory cache
    pub async fn new() -> Self {
        Self::with_cache(Cache::new(Arc::new(MemoryBackend::new()))).await
    }

    pub async fn with_cache(cache: Cache) -> Self {
        let db_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let pool = shipcv_storage::create_pool(&db_url).await.unwrap();
        shipcv_storage::run_migrations(&pool).await.unwrap();

        let web_dir = TempDir::new().unwrap();
        std::fs::write(web_dir.path().join("globals.css"), "body { margin: 0; }").unwrap();

        let auth_service = Arc::new(AuthService::new(TEST_SECRET.to_string(), 1));
        let app_state = AppState::new(
            pool.clone(),
            Arc::clone(&auth_service),
            cache.clone(),
            None,
        );
        let app = create_router(app_state, web_dir.path().to_path_buf());

        Self {
            app,
            pool,
            auth_service,
            cache,
            web_dir,
            _db_dir: db_dir,
        }
    }

    /// Send one request through a clone of the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Create a user that can sign in with [`TEST_PASSWORD`]
    pub async fn create_user(&self, email: &str) -> User {
        // Low cost keeps the tests fast; verification accepts any cost
        let hash = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
        shipcv_storage::users::create(
            &self.pool,
            NewUser::new(email).with_name("Test User").with_password_hash(hash),
        )
        .await
        .unwrap()
    }

    pub async fn connect_platform(&self, user: &User, platform: &str, username: &str) {
        shipcv_storage::platform_connections::upsert(
            &self.pool,
            NewPlatformConnection {
                user_id: user.id.clone(),
                platform: platform.to_string(),
                username: username.to_string(),
                last_synced: None,
                metadata: Some(serde_json::json!({ "repos": 3 })),
            },
        )
        .await
        .unwrap();
    }

    pub fn token_for(&self, user: &User) -> String {
        self.auth_service.create_session_token(user).unwrap()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
