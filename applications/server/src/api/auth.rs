/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::{auth::SESSION_COOKIE, AuthService},
    state::AppState,
};
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use shipcv_core::{SessionUser, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: SessionUser,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}")
}

fn issue_session(auth_service: &AuthService, user: &User) -> Result<impl IntoResponse> {
    let token = auth_service.create_session_token(user)?;
    let cookie = session_cookie(&token, auth_service.session_max_age_secs());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            token,
            user: SessionUser::from(user),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = shipcv_storage::users::find_by_email(&app_state.db, &req.email)
        .await
        .map_err(|e| ServerError::internal("Failed to sign in", e))?
        .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

    let password_hash = shipcv_storage::users::get_password_hash(&app_state.db, &user.id)
        .await
        .map_err(|e| ServerError::internal("Failed to sign in", e))?
        .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = %user.id, "User signed in");
    issue_session(&app_state.auth_service, &user)
}

/// GET /api/auth/session
pub async fn session(user: AuthenticatedUser) -> Json<SessionUser> {
    Json(user.0)
}

/// POST /api/auth/session/refresh
///
/// Reloads the profile from the store and reissues the token, so edits to
/// name, target role or job description show up in the session.
pub async fn refresh_session(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse> {
    let user = shipcv_storage::users::get_by_id(&app_state.db, user.user_id())
        .await
        .map_err(|e| ServerError::internal("Failed to refresh session", e))?
        .ok_or_else(ServerError::unauthorized)?;

    issue_session(&app_state.auth_service, &user)
}
