//! ShipCV Core
//!
//! Domain types shared by the ShipCV storage layer and server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `PlatformConnection`, `Project`, `Resume`
//! - **Session DTO**: `SessionUser`, the authenticated identity handed to
//!   request handlers through request extensions
//!
//! # Example
//!
//! ```rust
//! use shipcv_core::types::{SessionUser, UserId};
//!
//! let session = SessionUser::new(UserId::new("user-1"), "ada@example.com");
//! assert_eq!(session.id.as_str(), "user-1");
//! assert!(session.target_role.is_none());
//! ```

#![forbid(unsafe_code)]

pub mod types;

pub use types::{
    ConnectionId, ConnectionSummary, NewPlatformConnection, NewProject, NewResume, NewUser,
    PlatformConnection, PlatformSummary, Project, Resume, SessionUser, User, UserId,
};
