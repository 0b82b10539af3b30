/// Authentication middleware
use crate::{
    error::ServerError,
    services::{
        auth::{SECURE_SESSION_COOKIE, SESSION_COOKIE},
        AuthService,
    },
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use shipcv_core::{SessionUser, UserId};
use std::{convert::Infallible, sync::Arc};

/// Session of the caller, extracted from request extensions
///
/// Only available behind [`auth_middleware`]; elsewhere the extractor
/// rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionUser);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.id
    }

    pub fn session(&self) -> &SessionUser {
        &self.0
    }
}

/// Session of the caller when one was resolved, for pages that render
/// either way
#[derive(Debug, Clone, Default)]
pub struct OptionalSession(pub Option<SessionUser>);

/// Find the session token: bearer header first, then the secure cookie,
/// then the plain cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    cookie_value(headers, SECURE_SESSION_COOKIE).or_else(|| cookie_value(headers, SESSION_COOKIE))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Resolve the caller's session, if any; invalid tokens count as no session
pub fn resolve_session(auth_service: &AuthService, headers: &HeaderMap) -> Option<SessionUser> {
    let token = session_token(headers)?;

    match auth_service.verify_session(&token) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Session verification failed: {}", e);
            None
        }
    }
}

/// Middleware that rejects requests without a valid session
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let session = resolve_session(&auth_service, request.headers())
        .ok_or_else(ServerError::unauthorized)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Middleware that resolves the session when present and never rejects
pub async fn session_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(session) = resolve_session(&auth_service, request.headers()) {
        request.extensions_mut().insert(session);
    }

    next.run(request).await
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(ServerError::unauthorized)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(parts.extensions.get::<SessionUser>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_header_wins_over_cookies() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer header-token"),
            (header::COOKIE, "shipcv.session-token=cookie-token"),
        ]);
        assert_eq!(session_token(&map).as_deref(), Some("header-token"));
    }

    #[test]
    fn secure_cookie_wins_over_plain_cookie() {
        let map = headers(&[(
            header::COOKIE,
            "shipcv.session-token=plain; __Secure-shipcv.session-token=secure",
        )]);
        assert_eq!(session_token(&map).as_deref(), Some("secure"));
    }

    #[test]
    fn plain_cookie_is_accepted() {
        let map = headers(&[(header::COOKIE, "theme=dark; shipcv.session-token=plain")]);
        assert_eq!(session_token(&map).as_deref(), Some("plain"));
    }

    #[test]
    fn no_token_without_header_or_cookie() {
        let map = headers(&[
            (header::AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            (header::COOKIE, "theme=dark"),
        ]);
        assert!(session_token(&map).is_none());
    }

    #[test]
    fn invalid_token_resolves_to_no_session() {
        let auth = AuthService::new("secret".to_string(), 1);
        let map = headers(&[(header::AUTHORIZATION, "Bearer garbage")]);
        assert!(resolve_session(&auth, &map).is_none());
    }
}
