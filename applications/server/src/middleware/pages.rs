/// Route guard for web pages
///
/// Runs after [`super::session_middleware`], so the session (if any) is in
/// the request extensions.
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use shipcv_core::SessionUser;

/// Pages that require a signed-in user
const PROTECTED_PREFIXES: [&str; 3] = ["/dashboard", "/onboarding", "/settings"];

/// Pages a signed-in user is sent away from
const AUTH_PAGES: [&str; 2] = ["/login", "/signup"];

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_protected_page(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|p| matches_prefix(path, p))
}

pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGES.iter().any(|p| matches_prefix(path, p))
}

/// Where to send the caller, if anywhere
pub fn guard_redirect(path: &str, signed_in: bool) -> Option<String> {
    if !signed_in && is_protected_page(path) {
        let callback: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
        return Some(format!("/login?callbackUrl={callback}"));
    }

    if signed_in && is_auth_page(path) {
        return Some("/dashboard".to_string());
    }

    None
}

pub async fn page_guard(request: Request, next: Next) -> Response {
    let signed_in = request.extensions().get::<SessionUser>().is_some();

    if let Some(target) = guard_redirect(request.uri().path(), signed_in) {
        tracing::debug!(path = %request.uri().path(), target = %target, "Redirecting page request");
        return Redirect::temporary(&target).into_response();
    }

    next.run(request).await
}
