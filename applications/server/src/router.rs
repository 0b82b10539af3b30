/// HTTP router
use crate::{api, middleware, state::AppState, web};
use axum::{
    body::Body,
    http::Request,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

pub fn create_router(app_state: AppState, web_dir: PathBuf) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/login", post(api::auth::login));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/session", get(api::auth::session))
        .route("/auth/session/refresh", post(api::auth::refresh_session))
        .route("/user/connections", get(api::connections::list_connections))
        .route(
            "/platforms",
            get(api::platforms::list_platforms).delete(api::platforms::disconnect_platform),
        )
        .route("/resume/quota", get(api::resume::quota))
        .route(
            "/user/target-role",
            get(api::user::get_target_role).patch(api::user::update_target_role),
        )
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Pages: guard first, then static file or layout
    let pages: Router = Router::new()
        .fallback(
            move |session: middleware::OptionalSession, req: Request<Body>| {
                let web_dir = web_dir.clone();
                async move { web::page_fallback(web_dir, session, req).await }
            },
        )
        .layer(axum_middleware::from_fn(middleware::page_guard))
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::session_middleware,
        ));

    Router::new()
        .nest(
            "/api",
            public_routes
                .merge(protected_routes)
                .fallback(api::not_found),
        )
        .fallback_service(pages)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
