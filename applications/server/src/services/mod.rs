/// Server services
pub mod auth;
pub mod cache;
pub mod object_storage;

pub use auth::AuthService;
pub use cache::Cache;
pub use object_storage::ObjectStorageClient;
