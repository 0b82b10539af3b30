/// User domain type
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credits granted to every new account (two free analyses)
pub const DEFAULT_OPENAI_CREDITS: i64 = 20;

/// User account
///
/// Password hashes live only in the storage layer and are never part of
/// this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login email, stored lowercased
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Role the user is building resumes for
    pub target_role: Option<String>,

    /// Job description document generated or supplied for the target role
    pub job_description: Option<serde_json::Value>,

    /// Remaining AI analysis credits
    pub openai_credits: i64,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Data required to create a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            name: None,
            password_hash: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }
}
