/// API route modules
pub mod auth;
pub mod connections;
pub mod health;
pub mod platforms;
pub mod resume;
pub mod user;

use crate::error::ServerError;

/// Unmatched `/api/*` paths
pub async fn not_found() -> ServerError {
    ServerError::NotFound("Not found".to_string())
}
