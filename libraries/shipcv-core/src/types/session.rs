/// Session DTO carried through request context
use super::{User, UserId};
use serde::{Deserialize, Serialize};

/// Authenticated identity of the caller
///
/// Produced by the auth middleware from a verified session token and read by
/// handlers from request extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub target_role: Option<String>,

    #[serde(default)]
    pub job_description: Option<serde_json::Value>,
}

impl SessionUser {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: None,
            target_role: None,
            job_description: None,
        }
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            target_role: user.target_role.clone(),
            job_description: user.job_description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case() {
        let mut session = SessionUser::new(UserId::new("u1"), "a@b.co");
        session.target_role = Some("Backend Engineer".to_string());

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["targetRole"], "Backend Engineer");
        assert!(value["jobDescription"].is_null());
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let session: SessionUser =
            serde_json::from_value(json!({ "id": "u1", "email": "a@b.co" })).unwrap();
        assert!(session.name.is_none());
        assert!(session.job_description.is_none());
    }
}
