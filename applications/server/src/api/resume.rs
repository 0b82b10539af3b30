/// Resume quota API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::Serialize;

/// Resumes a user may generate
pub const RESUME_LIMIT: i64 = 2;

#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub count: i64,
    pub limit: i64,
    pub remaining: i64,
}

impl QuotaResponse {
    pub fn from_count(count: i64) -> Self {
        Self {
            count,
            limit: RESUME_LIMIT,
            remaining: (RESUME_LIMIT - count).max(0),
        }
    }
}

/// GET /api/resume/quota
pub async fn quota(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<QuotaResponse>> {
    let count = shipcv_storage::resumes::count_by_user(&app_state.db, user.user_id())
        .await
        .map_err(|e| ServerError::internal("Failed to fetch quota", e))?;

    Ok(Json(QuotaResponse::from_count(count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_never_negative() {
        let quota = QuotaResponse::from_count(5);
        assert_eq!(quota.limit, 2);
        assert_eq!(quota.remaining, 0);

        assert_eq!(QuotaResponse::from_count(1).remaining, 1);
    }
}
