/// Web pages: static files from the built UI, server-rendered layout
/// otherwise
pub mod layout;

pub use layout::render_root_layout;

use crate::middleware::OptionalSession;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::path::PathBuf;
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Mount point the client app renders into
const APP_MOUNT: &str = r#"<div id="app"></div>"#;

/// Serve a file from `web_dir`, or the root layout when there is none
///
/// `ServeDir` decodes the path and rejects traversal; its 404 falls through
/// to the layout.
pub async fn page_fallback(
    web_dir: PathBuf,
    OptionalSession(session): OptionalSession,
    request: Request<Body>,
) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD) {
        match ServeDir::new(&web_dir).oneshot(request).await {
            Ok(res) if res.status() != StatusCode::NOT_FOUND => return res.into_response(),
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to serve static file: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    }

    Html(render_root_layout(APP_MOUNT, session.as_ref())).into_response()
}
