mod connection;
mod ids;
mod project;
mod resume;
mod session;
mod user;

pub use connection::{
    ConnectionSummary, NewPlatformConnection, PlatformConnection, PlatformSummary,
};
pub use ids::{ConnectionId, UserId};
pub use project::{NewProject, Project};
pub use resume::{NewResume, Resume};
pub use session::SessionUser;
pub use user::{NewUser, User, DEFAULT_OPENAI_CREDITS};
