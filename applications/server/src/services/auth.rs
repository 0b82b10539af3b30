/// Authentication service - session tokens and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shipcv_core::{SessionUser, User, UserId};

/// Cookie carrying the session token on plain HTTP
pub const SESSION_COOKIE: &str = "shipcv.session-token";

/// Cookie carrying the session token behind HTTPS
pub const SECURE_SESSION_COOKIE: &str = "__Secure-shipcv.session-token";

/// Longest accepted session lifetime: ten years
pub const MAX_SESSION_HOURS: u64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    session_expiration: Duration,
}

/// Session token claims
///
/// Profile fields ride along in the token so handlers get them without a
/// database round trip.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<serde_json::Value>,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: UserId::new(claims.sub),
            email: claims.email,
            name: claims.name,
            target_role: claims.target_role,
            job_description: claims.job_description,
        }
    }
}

impl AuthService {
    pub fn new(secret: String, expiration_hours: u64) -> Self {
        Self {
            secret,
            session_expiration: Duration::hours(expiration_hours.min(MAX_SESSION_HOURS) as i64),
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Session lifetime in seconds, for cookie `Max-Age`
    pub fn session_max_age_secs(&self) -> i64 {
        self.session_expiration.num_seconds()
    }

    /// Create a session token for a user
    pub fn create_session_token(&self, user: &User) -> Result<String> {
        self.create_token(SessionUser::from(user))
    }

    /// Verify a session token and return the identity it carries
    pub fn verify_session(&self, token: &str) -> Result<SessionUser> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims.into())
    }

    fn create_token(&self, session: SessionUser) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.session_expiration;

        let claims = Claims {
            sub: session.id.as_str().to_string(),
            email: session.email,
            name: session.name,
            target_role: session.target_role,
            job_description: session.job_description,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }
}
