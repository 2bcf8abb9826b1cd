//! External caption tool
//!
//! The orchestrator talks to yt-dlp through the [`CaptionTool`] trait so
//! tests can script the tool's behaviour. [`YtDlp`] is the real thing: a
//! subprocess started with an argument vector (never a shell string),
//! bounded by a wall-clock timeout and an output cap.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::config::ExtractorConfig;
use crate::error::ToolError;

/// Which caption track a stage asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionKind {
    /// Speech-recognition captions
    Auto,
    /// Captions uploaded by the owner or community
    Manual,
}

impl CaptionKind {
    /// yt-dlp flag selecting this caption track
    pub fn flag(&self) -> &'static str {
        match self {
            CaptionKind::Auto => "--write-auto-sub",
            CaptionKind::Manual => "--write-sub",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionKind::Auto => "auto",
            CaptionKind::Manual => "manual",
        }
    }
}

/// One caption download request
#[derive(Debug, Clone)]
pub struct CaptionJob<'a> {
    pub url: &'a str,
    pub kind: CaptionKind,
    /// Directory the tool writes into
    pub work_dir: &'a Path,
    /// File name prefix every artifact of this job starts with
    pub prefix: &'a str,
}

/// Captured result of a finished tool run
#[derive(Debug, Default)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Contract of the external caption downloader
#[async_trait]
pub trait CaptionTool: Send + Sync {
    /// Check the tool can be started. Returns its version string.
    async fn probe(&self) -> Result<String, ToolError>;

    /// Ask the tool to write captions for `job` into its work dir.
    ///
    /// A non-zero exit is an error; the caller decides whether it matters.
    async fn fetch(&self, job: &CaptionJob<'_>) -> Result<ToolOutput, ToolError>;
}

/// yt-dlp subprocess runner
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    language: String,
    format: String,
    timeout: Duration,
    max_output_bytes: usize,
}

impl YtDlp {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            binary: PathBuf::from(&config.binary),
            language: config.language.clone(),
            format: config.subtitle_format.clone(),
            timeout: config.timeout(),
            max_output_bytes: config.max_output_bytes,
        }
    }

    /// Argument vector for one caption download
    pub fn args(&self, job: &CaptionJob<'_>) -> Vec<String> {
        vec![
            job.kind.flag().to_string(),
            "--sub-lang".to_string(),
            self.language.clone(),
            "--sub-format".to_string(),
            self.format.clone(),
            "--skip-download".to_string(),
            "--no-playlist".to_string(),
            "--no-exec".to_string(),
            "--output".to_string(),
            format!("{}.%(ext)s", job.prefix),
            "--".to_string(),
            job.url.to_string(),
        ]
    }

    async fn run(&self, args: &[String], dir: Option<&Path>) -> Result<ToolOutput, ToolError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        tracing::debug!("Executing {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                ToolError::NotInstalled(format!("{}: {}", self.binary.display(), e))
            }
            _ => ToolError::Io(e),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cap = self.max_output_bytes;

        let finished = tokio::time::timeout(self.timeout, async {
            let (stdout, stderr) =
                tokio::try_join!(read_capped(stdout, cap), read_capped(stderr, cap))?;
            let status = child.wait().await?;
            Ok::<_, ToolError>((status, stdout, stderr))
        })
        .await;

        let (status, stdout, stderr) = match finished {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                kill(&mut child).await;
                return Err(e);
            }
            Err(_) => {
                kill(&mut child).await;
                return Err(ToolError::Timeout(self.timeout.as_secs()));
            }
        };

        if !status.success() {
            return Err(ToolError::Failed {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

async fn kill(child: &mut tokio::process::Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!("Failed to kill yt-dlp process: {}", e);
    }
}

/// Read a pipe to the end, failing once it yields more than `cap` bytes.
async fn read_capped<R>(pipe: Option<R>, cap: usize) -> Result<Vec<u8>, ToolError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let Some(pipe) = pipe else {
        return Ok(buf);
    };
    pipe.take(cap as u64 + 1).read_to_end(&mut buf).await?;
    if buf.len() > cap {
        return Err(ToolError::OutputLimit(cap));
    }
    Ok(buf)
}

#[async_trait]
impl CaptionTool for YtDlp {
    async fn probe(&self) -> Result<String, ToolError> {
        let output = self.run(&["--version".to_string()], None).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn fetch(&self, job: &CaptionJob<'_>) -> Result<ToolOutput, ToolError> {
        self.run(&self.args(job), Some(job.work_dir)).await
    }
}
