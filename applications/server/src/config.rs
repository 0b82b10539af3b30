/// Server configuration
use crate::error::{Result, ServerError};
use crate::services::auth::MAX_SESSION_HOURS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub object_storage: ObjectStorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built web UI; pages fall back to the server-rendered layout when a
    /// file is missing here
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Upstash REST if configured, else native Redis if configured, else off
    #[default]
    Auto,
    /// In-process map, for local development
    Memory,
    Disabled,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub backend: CacheBackendKind,

    pub upstash_url: Option<String>,
    pub upstash_token: Option<String>,
    pub redis_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectStorageSettings {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub bucket: Option<String>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Sources, lowest precedence first: `config.toml`, `SHIPCV_*` variables
    /// (`SHIPCV_AUTH__JWT_SECRET`), then the conventional variable names
    /// such as `DATABASE_URL` or `SUPABASE_URL`.
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SHIPCV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay the conventional environment variable names
    ///
    /// Empty values are ignored. `NEXTAUTH_SECRET` wins over `AUTH_SECRET`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.storage.database_url = url;
        }
        if let Some(secret) = get("NEXTAUTH_SECRET").or_else(|| get("AUTH_SECRET")) {
            self.auth.jwt_secret = secret;
        }
        if let Some(url) = get("UPSTASH_REDIS_REST_URL") {
            self.cache.upstash_url = Some(url);
        }
        if let Some(token) = get("UPSTASH_REDIS_REST_TOKEN") {
            self.cache.upstash_token = Some(token);
        }
        if let Some(url) = get("REDIS_URL") {
            self.cache.redis_url = Some(url);
        }
        if let Some(url) = get("SUPABASE_URL") {
            self.object_storage.url = Some(url);
        }
        if let Some(key) = get("SUPABASE_SERVICE_ROLE_KEY") {
            self.object_storage.service_key = Some(key);
        }
        if let Some(bucket) = get("SUPABASE_STORAGE_BUCKET") {
            self.object_storage.bucket = Some(bucket);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set NEXTAUTH_SECRET or SHIPCV_AUTH__JWT_SECRET)"
                    .to_string(),
            ));
        }

        if self.auth.jwt_expiration_hours == 0 {
            return Err(ServerError::Config(
                "auth.jwt_expiration_hours must be positive".to_string(),
            ));
        }

        if self.auth.jwt_expiration_hours > MAX_SESSION_HOURS {
            return Err(ServerError::Config(format!(
                "auth.jwt_expiration_hours must be at most {}",
                MAX_SESSION_HOURS
            )));
        }

        Ok(())
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("./web")
}

fn default_database_url() -> String {
    "sqlite://./data/shipcv.db".to_string()
}

fn default_jwt_expiration_hours() -> u64 {
    // 30 days
    720
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: default_web_dir(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: default_jwt_expiration_hours(),
        }
    }
}
