/// Generated resume types
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub user_id: UserId,
    pub title: String,
    pub target_role: Option<String>,

    /// LaTeX template key (`modern`, `classic`, `minimal`)
    pub template_id: String,

    pub latex_content: String,

    /// Location of the compiled PDF in object storage
    pub pdf_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResume {
    pub user_id: UserId,
    pub title: String,
    pub target_role: Option<String>,
    pub template_id: String,
    pub latex_content: String,
}
