//! Transcript extraction
//!
//! This module drives yt-dlp to obtain a transcript:
//! - Probing that the tool is installed
//! - Stage A: auto-generated captions
//! - Stage B: manually authored captions, when stage A gave nothing
//! - Locating and cleaning the caption file
//! - Removing the request's temporary files on every exit path

pub mod artifacts;
pub mod tool;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, ToolError, TranscriptError};
use crate::subtitle::{clean, find_caption_file};

pub use artifacts::ArtifactScope;
pub use tool::{CaptionJob, CaptionKind, CaptionTool, YtDlp};

/// Order in which caption tracks are tried
pub const STAGES: [CaptionKind; 2] = [CaptionKind::Auto, CaptionKind::Manual];

/// Result of a single stage
#[derive(Debug)]
enum StageOutcome {
    Transcript(String),
    Empty,
}

/// Caption extraction orchestrator
#[derive(Clone)]
pub struct Extractor {
    tool: Arc<dyn CaptionTool>,
    work_dir: PathBuf,
    extension: String,
}

impl Extractor {
    pub fn new(tool: Arc<dyn CaptionTool>, work_dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            tool,
            work_dir: work_dir.into(),
            extension: extension.to_string(),
        }
    }

    pub fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }

    /// Check that the caption tool can be started
    pub async fn probe(&self) -> Result<String> {
        self.tool.probe().await.map_err(|e| match e {
            ToolError::NotInstalled(msg) => TranscriptError::ToolUnavailable(msg),
            other => TranscriptError::ToolUnavailable(other.to_string()),
        })
    }

    /// Fetch the transcript for `url`.
    ///
    /// Returns `NotFound` when neither stage yields text, `Timeout` when
    /// the tool was killed, and `ToolUnavailable` when yt-dlp is missing.
    pub async fn extract(&self, url: &str) -> Result<String> {
        self.probe().await?;

        let scope = ArtifactScope::new(&self.work_dir);
        tracing::info!(request_id = %scope.request_id(), "Extracting transcript for {}", url);

        let result = self.run_stages(url, &scope).await;
        scope.cleanup().await;
        result
    }

    async fn run_stages(&self, url: &str, scope: &ArtifactScope) -> Result<String> {
        for kind in STAGES {
            match self.run_stage(url, kind, scope).await? {
                StageOutcome::Transcript(text) => {
                    tracing::info!(
                        request_id = %scope.request_id(),
                        stage = kind.as_str(),
                        "Transcript extracted ({} chars)",
                        text.chars().count()
                    );
                    return Ok(text);
                }
                StageOutcome::Empty => {
                    tracing::info!(
                        request_id = %scope.request_id(),
                        stage = kind.as_str(),
                        "No usable captions"
                    );
                }
            }
        }
        Err(TranscriptError::NotFound)
    }

    async fn run_stage(
        &self,
        url: &str,
        kind: CaptionKind,
        scope: &ArtifactScope,
    ) -> Result<StageOutcome> {
        let prefix = scope.stage_prefix(kind);
        let job = CaptionJob {
            url,
            kind,
            work_dir: scope.dir(),
            prefix: &prefix,
        };

        match self.tool.fetch(&job).await {
            Ok(output) => {
                tracing::debug!(
                    request_id = %scope.request_id(),
                    stage = kind.as_str(),
                    "yt-dlp finished ({} bytes stdout, {} bytes stderr)",
                    output.stdout.len(),
                    output.stderr.len()
                );
            }
            Err(ToolError::Timeout(_)) | Err(ToolError::OutputLimit(_)) => {
                tracing::warn!(
                    request_id = %scope.request_id(),
                    stage = kind.as_str(),
                    "yt-dlp was killed"
                );
                return Err(TranscriptError::Timeout);
            }
            Err(ToolError::NotInstalled(msg)) => {
                return Err(TranscriptError::ToolUnavailable(msg));
            }
            // A failed run may still have written a file; look before giving up.
            Err(e) => {
                tracing::debug!(
                    request_id = %scope.request_id(),
                    stage = kind.as_str(),
                    "yt-dlp failed: {}",
                    e
                );
            }
        }

        let Some(path) = find_caption_file(scope.dir(), &prefix, &self.extension).await? else {
            return Ok(StageOutcome::Empty);
        };

        let raw = tokio::fs::read(&path).await?;
        let text = clean(&String::from_utf8_lossy(&raw));
        if text.is_empty() {
            Ok(StageOutcome::Empty)
        } else {
            Ok(StageOutcome::Transcript(text))
        }
    }
}
