//! Axum router configuration

use axum::{
    http::{header, request, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{fetch_transcript, health_check, not_found};
use super::middleware::{origin_guard, request_logger};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let policy = state.origins.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &request::Parts| {
                origin
                    .to_str()
                    .map(|o| policy.is_allowed(o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(state.config.cors.allow_credentials)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/transcript", post(fetch_transcript))
        .fallback(not_found)
        // Middleware, innermost first. Preflights are answered by the CORS
        // layer; other requests from unknown origins stop at the guard.
        .layer(middleware::from_fn(request_logger))
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
