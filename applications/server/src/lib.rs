//! ShipCV Server Library
//!
//! HTTP API, server-rendered layout and maintenance commands for the ShipCV
//! resume builder.
//!
//! This library exposes the core components for testing purposes.

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;
pub mod web;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{AuthService, Cache, ObjectStorageClient};
pub use state::AppState;
