/// Imported project types
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository, article or other work item imported from a platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: UserId,
    pub platform: String,

    /// Identifier of the item on its platform
    pub external_id: String,

    pub name: String,
    pub description: Option<String>,
    pub url: String,

    /// Relevance score from the last AI analysis
    pub ai_score: Option<f64>,

    /// Whether the user picked this project for their resume
    pub is_selected: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub user_id: UserId,
    pub platform: String,
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
}
