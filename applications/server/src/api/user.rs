/// Target role API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRoleRequest {
    pub target_role: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRoleResponse {
    pub target_role: Option<String>,
    pub job_description: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTargetRoleResponse {
    pub success: bool,
    pub target_role: String,
    pub job_description: Value,
    pub cached: bool,
}

/// Job description document for a role, with `summary` as the only prose
pub fn basic_job_description(target_role: &str, summary: &str) -> Value {
    let keywords: Vec<String> = target_role
        .to_lowercase()
        .split(' ')
        .map(str::to_string)
        .collect();

    json!({
        "title": target_role,
        "summary": summary,
        "requiredSkills": [],
        "preferredSkills": [],
        "responsibilities": [],
        "keywords": keywords,
        "experienceLevel": "Mid",
        "industry": ["technology"],
    })
}

/// GET /api/user/target-role
pub async fn get_target_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TargetRoleResponse>> {
    let user = shipcv_storage::users::get_by_id(&app_state.db, user.user_id())
        .await
        .map_err(|e| ServerError::internal("Failed to fetch target role", e))?
        .ok_or_else(ServerError::unauthorized)?;

    Ok(Json(TargetRoleResponse {
        target_role: user.target_role,
        job_description: user.job_description,
    }))
}

/// PATCH /api/user/target-role
///
/// Keeps the stored job description when the role is unchanged and the
/// document has a title. The session token still carries the old role until
/// the client calls `/api/auth/session/refresh`.
pub async fn update_target_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<TargetRoleRequest>,
) -> Result<Json<UpdateTargetRoleResponse>> {
    let target_role = req
        .target_role
        .filter(|role| !role.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Target role is required".to_string()))?;

    let existing = shipcv_storage::users::get_by_id(&app_state.db, user.user_id())
        .await
        .map_err(|e| ServerError::internal("Failed to update target role", e))?
        .ok_or_else(ServerError::unauthorized)?;

    let cached = existing.target_role.as_deref() == Some(target_role.as_str());

    let job_description = match existing.job_description {
        Some(stored) if cached && stored.get("title").is_some() => stored,
        _ => basic_job_description(&target_role, req.job_description.as_deref().unwrap_or("")),
    };

    shipcv_storage::users::set_target_role(
        &app_state.db,
        user.user_id(),
        Some(&target_role),
        Some(&job_description),
    )
    .await
    .map_err(|e| ServerError::internal("Failed to update target role", e))?;

    tracing::info!(user_id = %user.user_id(), target_role = %target_role, cached, "Target role updated");

    Ok(Json(UpdateTargetRoleResponse {
        success: true,
        target_role,
        job_description,
        cached,
    }))
}
