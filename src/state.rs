//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - The transcript extractor (caption tool + work directory)
//! - The cross-origin policy
//! - Server configuration

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::extract::{CaptionTool, Extractor, YtDlp};
use crate::http::origin::OriginPolicy;

/// Application state shared across all handlers
pub struct AppState {
    /// Transcript extractor
    pub extractor: Extractor,

    /// Allowed cross-origin callers
    pub origins: OriginPolicy,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState backed by yt-dlp
    pub fn new(config: ServerConfig) -> Self {
        let tool = Arc::new(YtDlp::new(&config.extractor));
        Self::with_tool(config, tool)
    }

    /// Create AppState with an explicit caption tool
    pub fn with_tool(config: ServerConfig, tool: Arc<dyn CaptionTool>) -> Self {
        let extractor = Extractor::new(
            tool,
            config.extractor.resolved_work_dir(),
            &config.extractor.subtitle_format,
        );
        Self {
            extractor,
            origins: OriginPolicy::new(&config.cors.allowed_origins),
            config,
        }
    }
}
