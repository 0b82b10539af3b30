/// Linked platforms API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shipcv_core::{PlatformSummary, UserId};

#[derive(Debug, Serialize, Deserialize)]
pub struct PlatformsResponse {
    pub connections: Vec<PlatformSummary>,
}

#[derive(Debug, Deserialize)]
pub struct DisconnectQuery {
    pub platform: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
    pub message: String,
}

/// Cache key for a user's platform list
pub fn platforms_cache_key(user_id: &UserId) -> String {
    format!("platforms:{}", user_id)
}

/// GET /api/platforms
pub async fn list_platforms(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<PlatformsResponse>> {
    let cache_key = platforms_cache_key(user.user_id());

    if let Some(cached) = app_state.cache.get::<PlatformsResponse>(&cache_key).await {
        tracing::debug!(key = %cache_key, "Serving platforms from cache");
        return Ok(Json(cached));
    }

    let connections =
        shipcv_storage::platform_connections::get_platform_summaries(&app_state.db, user.user_id())
            .await
            .map_err(|e| ServerError::internal("Failed to fetch platforms", e))?;

    let response = PlatformsResponse { connections };
    app_state.cache.set_default(&cache_key, &response).await;

    Ok(Json(response))
}

/// DELETE /api/platforms?platform=<platform>
pub async fn disconnect_platform(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DisconnectQuery>,
) -> Result<Json<DisconnectResponse>> {
    let platform = query
        .platform
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Platform is required".to_string()))?;

    let deleted =
        shipcv_storage::platform_connections::delete(&app_state.db, user.user_id(), &platform)
            .await
            .map_err(|e| ServerError::internal("Failed to disconnect platform", e))?;

    if !deleted {
        return Err(ServerError::NotFound("Platform connection not found".to_string()));
    }

    app_state
        .cache
        .delete(&platforms_cache_key(user.user_id()))
        .await;

    tracing::info!(user_id = %user.user_id(), platform = %platform, "Platform disconnected");

    Ok(Json(DisconnectResponse {
        success: true,
        message: "Platform disconnected".to_string(),
    }))
}
