//! HTTP request handlers
//!
//! Implements the health, transcript and fallback endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ErrorBody, Result, TranscriptError};
use crate::state::AppState;
use crate::subtitle::cleaner::transcript_length;

/// Body of `POST /api/transcript`
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub url: Option<String>,
}

/// Successful transcript response
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub success: bool,
    pub url: String,
    pub transcript: String,
    pub length: usize,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

/// Check that `url` looks like a YouTube video link.
pub fn is_youtube_url(url: &str) -> bool {
    regex!(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$").is_match(url)
}

/// Health check endpoint
/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "YouTube Transcript API is running",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Transcript endpoint
/// POST /api/transcript
pub async fn fetch_transcript(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TranscriptRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>> {
    let url = match payload {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            tracing::debug!("Unreadable transcript request: {}", rejection);
            None
        }
    };

    let url = url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(TranscriptError::MissingUrl)?;

    if !is_youtube_url(&url) {
        return Err(TranscriptError::InvalidUrl(url));
    }

    // Detached from the connection: a client hanging up does not cancel yt-dlp.
    let extractor = state.extractor.clone();
    let job_url = url.clone();
    let transcript = tokio::spawn(async move { extractor.extract(&job_url).await })
        .await
        .map_err(|e| TranscriptError::Internal(e.to_string()))??;

    let length = transcript_length(&transcript);
    Ok(Json(TranscriptResponse {
        success: true,
        url,
        transcript,
        length,
    }))
}

/// Fallback for unmatched routes
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Not Found", "Route not found")),
    )
}
