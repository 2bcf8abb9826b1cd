//! Caption file discovery
//!
//! yt-dlp appends its own language and format segments to the output
//! template (`temp_<id>.en.vtt`, `temp_<id>.en-orig.vtt`, ...), so the
//! file name is matched on prefix and extension only.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Return true when `name` belongs to `prefix` and carries `extension`.
pub fn matches_caption(name: &str, prefix: &str, extension: &str) -> bool {
    name.starts_with(prefix)
        && name
            .strip_suffix(extension)
            .and_then(|stem| stem.strip_suffix('.'))
            .is_some_and(|stem| stem.len() >= prefix.len())
}

/// Scan `dir` once and return the first caption file for `prefix`.
///
/// Returns `Ok(None)` when yt-dlp wrote nothing for this prefix.
pub async fn find_caption_file(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if matches_caption(name, prefix, extension) {
            tracing::debug!("Found caption file {}", name);
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}
