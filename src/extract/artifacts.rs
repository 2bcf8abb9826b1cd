//! Request-scoped temporary files
//!
//! Every extraction owns a unique file name prefix inside the shared work
//! directory. Concurrent requests are isolated by prefix alone, so cleanup
//! must never touch a file outside its own prefix.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::tool::CaptionKind;

/// Temporary-file scope for a single request
#[derive(Debug)]
pub struct ArtifactScope {
    request_id: Uuid,
    dir: PathBuf,
    prefix: String,
    cleaned: bool,
}

impl ArtifactScope {
    /// Open a scope with a fresh request id
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_request_id(dir, Uuid::new_v4())
    }

    pub fn with_request_id(dir: impl Into<PathBuf>, request_id: Uuid) -> Self {
        Self {
            request_id,
            dir: dir.into(),
            prefix: prefix_for(&request_id),
            cleaned: false,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Remove every file in the work dir that starts with this scope's prefix.
    ///
    /// Individual failures are logged and skipped. Returns the number of
    /// files removed.
    pub async fn cleanup(mut self) -> usize {
        self.cleaned = true;

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    request_id = %self.request_id,
                    "Failed to list {} for cleanup: {}",
                    self.dir.display(),
                    e
                );
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(request_id = %self.request_id, "Cleanup scan failed: {}", e);
                    break;
                }
            };
            if !self.owns(&entry.file_name().to_string_lossy()) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    request_id = %self.request_id,
                    "Failed to remove {}: {}",
                    entry.path().display(),
                    e
                ),
            }
        }

        tracing::debug!(request_id = %self.request_id, "Removed {} temporary file(s)", removed);
        removed
    }

    /// Prefix for the files one extraction stage writes
    pub fn stage_prefix(&self, kind: CaptionKind) -> String {
        format!("{}_{}", self.prefix, kind.as_str())
    }

    fn owns(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    fn cleanup_blocking(&self) {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            if self.owns(&entry.file_name().to_string_lossy()) {
                if let Err(e) = std::fs::remove_file(entry.path()) {
                    tracing::warn!("Failed to remove {}: {}", entry.path().display(), e);
                }
            }
        }
    }
}

impl Drop for ArtifactScope {
    fn drop(&mut self) {
        // Only reached when the owning task was aborted before cleanup().
        if !self.cleaned {
            self.cleanup_blocking();
        }
    }
}

/// File name prefix for a request. Fixed width, so no prefix is a prefix of another.
pub fn prefix_for(request_id: &Uuid) -> String {
    format!("temp_{}", request_id.simple())
}
