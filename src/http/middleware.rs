//! HTTP middleware
//!
//! Additional middleware for the HTTP server.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::ErrorBody;
use crate::state::AppState;

/// Request logging middleware
pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        info!("{} {} {} in {:?}", method, uri, status, duration);
    } else {
        warn!("{} {} {} in {:?}", method, uri, status, duration);
    }

    response
}

/// Reject browser requests from origins outside the allow-list.
///
/// Requests without an `Origin` header are not cross-origin and pass.
pub async fn origin_guard(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .map(|v| v.to_str().unwrap_or_default().to_string());

    match origin {
        Some(origin) if !state.origins.is_allowed(&origin) => {
            warn!("Rejected request from origin {:?}", origin);
            (
                StatusCode::FORBIDDEN,
                Json(ErrorBody::new("Forbidden", "Not allowed by CORS")),
            )
                .into_response()
        }
        _ => next.run(request).await,
    }
}
