/// Platform connections of the current user
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::Serialize;
use shipcv_core::ConnectionSummary;

#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub connections: Vec<ConnectionSummary>,
}

/// GET /api/user/connections
///
/// Only the caller's own rows, oldest first. Store failures are logged and
/// answered with a generic 500.
pub async fn list_connections(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ConnectionsResponse>> {
    let connections =
        shipcv_storage::platform_connections::get_summaries_by_user(&app_state.db, user.user_id())
            .await
            .map_err(|e| ServerError::internal("Failed to fetch connections", e))?;

    Ok(Json(ConnectionsResponse { connections }))
}
