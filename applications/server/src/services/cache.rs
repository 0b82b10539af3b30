//! Cache helper over a remote key-value store
//!
//! Values are stored as JSON text with an expiry. The cache never fails a
//! request: transport and decode errors are logged and turned into a miss
//! (`get`) or dropped (`set`, `delete`).

use crate::config::{CacheBackendKind, CacheSettings};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Expiry used by [`Cache::set_default`]: one hour
pub const DEFAULT_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache service error: {0}")]
    Api(String),

    #[error("Invalid cache configuration: {0}")]
    Config(String),
}

type BackendResult<T> = std::result::Result<T, CacheError>;

/// Raw string operations a cache store has to provide
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    async fn get_raw(&self, key: &str) -> BackendResult<Option<String>>;

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> BackendResult<()>;

    async fn del(&self, key: &str) -> BackendResult<()>;
}

/// Upstash-compatible Redis REST API
///
/// Every command is a JSON array posted to the base URL with a bearer token;
/// replies are `{"result": ...}` or `{"error": "..."}`.
pub struct UpstashBackend {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl UpstashBackend {
    pub fn new(url: &str, token: &str) -> BackendResult<Self> {
        let parsed = url::Url::parse(url).map_err(|e| CacheError::Config(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CacheError::Config(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()?;

        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn command(&self, args: Value) -> BackendResult<Value> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(CacheError::Api(error.to_string()));
        }
        if !status.is_success() {
            return Err(CacheError::Api(format!("HTTP {status}")));
        }

        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl CacheBackend for UpstashBackend {
    fn name(&self) -> &'static str {
        "upstash"
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Option<String>> {
        match self.command(json!(["GET", key])).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Ok(Some(other.to_string())),
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> BackendResult<()> {
        self.command(json!(["SETEX", key, ttl_secs, value])).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> BackendResult<()> {
        self.command(json!(["DEL", key])).await?;
        Ok(())
    }
}

/// Native Redis over a reconnecting connection manager
pub struct RedisBackend {
    connection: ConnectionManager,
}

impl RedisBackend {
    pub async fn connect(redis_url: &str) -> BackendResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_connection_manager().await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> BackendResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> BackendResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// Value and expiry; `None` never expires
type MemoryEntry = (String, Option<Instant>);

/// In-process store for local development
///
/// Expired entries are dropped when read and swept on every write.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> BackendResult<std::sync::MutexGuard<'_, HashMap<String, MemoryEntry>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Api("memory cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let expired = matches!(entries.get(key), Some((_, Some(expires_at))) if *expires_at <= now);
        if expired {
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> BackendResult<()> {
        let now = Instant::now();
        // TTLs too large for the clock never expire
        let expires_at = now.checked_add(Duration::from_secs(ttl_secs));

        let mut entries = self.lock()?;
        entries.retain(|_, (_, expiry)| expiry.map_or(true, |at| at > now));
        entries.insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn del(&self, key: &str) -> BackendResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON cache handle shared through application state
#[derive(Clone, Default)]
pub struct Cache {
    backend: Option<Arc<dyn CacheBackend>>,
}

impl Cache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A cache that stores nothing; every lookup misses
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Build the cache described by the settings
    ///
    /// A backend that cannot be created is logged and replaced by a disabled
    /// cache; the server still starts.
    pub async fn from_settings(settings: &CacheSettings) -> Self {
        match settings.backend {
            CacheBackendKind::Disabled => return Self::disabled(),
            CacheBackendKind::Memory => return Self::new(Arc::new(MemoryBackend::new())),
            CacheBackendKind::Auto => {}
        }

        if let (Some(url), Some(token)) = (&settings.upstash_url, &settings.upstash_token) {
            return match UpstashBackend::new(url, token) {
                Ok(backend) => Self::new(Arc::new(backend)),
                Err(e) => {
                    tracing::error!("Upstash cache unavailable, caching disabled: {}", e);
                    Self::disabled()
                }
            };
        }

        if let Some(redis_url) = &settings.redis_url {
            return match RedisBackend::connect(redis_url).await {
                Ok(backend) => Self::new(Arc::new(backend)),
                Err(e) => {
                    tracing::error!("Redis cache unavailable, caching disabled: {}", e);
                    Self::disabled()
                }
            };
        }

        Self::disabled()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.as_ref().map_or("disabled", |b| b.name())
    }

    /// Look up a value; `None` on miss, transport error or undecodable value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;

        let raw = match backend.get_raw(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!("Cache get error: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(key = %key, "Cache decode error: {}", e);
                None
            }
        }
    }

    /// Store a value for `ttl_secs` seconds
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_secs: u64) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(key = %key, "Cache encode error: {}", e);
                return;
            }
        };

        if let Err(e) = backend.set_ex(key, encoded, ttl_secs).await {
            tracing::error!("Cache set error: {}", e);
        }
    }

    /// Store a value for [`DEFAULT_TTL_SECS`]
    pub async fn set_default<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        self.set(key, value, DEFAULT_TTL_SECS).await;
    }

    pub async fn delete(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        if let Err(e) = backend.del(key).await {
            tracing::error!("Cache delete error: {}", e);
        }
    }
}
