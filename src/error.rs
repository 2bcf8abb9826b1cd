use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the transcript server
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("YouTube URL is required")]
    MissingUrl,

    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("yt-dlp is not installed or not reachable: {0}")]
    ToolUnavailable(String),

    #[error("No captions available for this video")]
    NotFound,

    #[error("Caption extraction timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by the external caption tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("executable not found: {0}")]
    NotInstalled(String),

    #[error("process killed after {0} seconds")]
    Timeout(u64),

    #[error("process output exceeded {0} bytes")]
    OutputLimit(usize),

    #[error("process exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON body used for every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl TranscriptError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            TranscriptError::MissingUrl | TranscriptError::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            TranscriptError::NotFound => StatusCode::NOT_FOUND,
            TranscriptError::Timeout => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            TranscriptError::MissingUrl => {
                ErrorBody::new("Bad Request", "YouTube URL is required")
            }
            TranscriptError::InvalidUrl(_) => {
                ErrorBody::new("Bad Request", "Please provide a valid YouTube URL")
            }
            TranscriptError::NotFound => ErrorBody::new(
                "Transcript Not Found",
                "No subtitles or auto-generated captions are available for this video",
            ),
            TranscriptError::Timeout => ErrorBody::new(
                "Request Timeout",
                "Fetching the transcript took too long. Please try again.",
            ),
            TranscriptError::ToolUnavailable(detail) => ErrorBody::new(
                "Server Configuration Error",
                "yt-dlp is not installed on the server",
            )
            .with_details(detail.clone()),
            other => ErrorBody::new("Internal Server Error", "Failed to fetch transcript")
                .with_details(other.to_string()),
        }
    }
}

impl IntoResponse for TranscriptError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TranscriptError>;
