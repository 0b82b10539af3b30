/// Request middleware
pub mod auth;
pub mod pages;

pub use auth::{auth_middleware, session_middleware, AuthenticatedUser, OptionalSession};
pub use pages::page_guard;
