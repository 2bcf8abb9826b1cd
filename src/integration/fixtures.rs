//! Test fixtures for integration tests
//!
//! Provides a scripted caption tool so the extraction pipeline and the
//! HTTP surface can be exercised without yt-dlp or network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::ToolError;
use crate::extract::tool::ToolOutput;
use crate::extract::{CaptionJob, CaptionKind, CaptionTool};
use crate::state::AppState;

/// Caption document used by most tests
pub const HELLO_VTT: &str = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nHello <c>world</c>\n\n00:00:02.000 --> 00:00:04.000\nhow are you\n";

/// Manual caption document
pub const MANUAL_VTT: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n1\n00:00:00.000 --> 00:00:03.000\n<v Host>Welcome to the show</v>\n";

/// What the fake tool does for one stage
#[derive(Debug, Clone)]
pub enum Step {
    /// Exit successfully after writing a caption file
    Write(String),
    /// Write a caption file, then exit non-zero
    WriteAndFail(String),
    /// Exit non-zero without writing anything
    Fail,
    /// Exit successfully without writing anything
    Nothing,
    /// Leave a partial file behind and get killed after the delay
    Hang(Duration),
}

/// Scripted stand-in for yt-dlp
#[derive(Debug)]
pub struct ScriptedTool {
    installed: bool,
    auto: Step,
    manual: Step,
    /// Optional per-URL override of the auto/manual steps
    by_url: Mutex<HashMap<String, (Step, Step)>>,
    fetches: AtomicUsize,
    probes: AtomicUsize,
}

impl ScriptedTool {
    pub fn new(auto: Step, manual: Step) -> Self {
        Self {
            installed: true,
            auto,
            manual,
            by_url: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        }
    }

    /// A tool that is not installed on the host
    pub fn missing() -> Self {
        Self {
            installed: false,
            ..Self::new(Step::Nothing, Step::Nothing)
        }
    }

    /// Use different steps for a specific URL
    pub fn script_url(&self, url: &str, auto: Step, manual: Step) {
        self.by_url
            .lock()
            .unwrap()
            .insert(url.to_string(), (auto, manual));
    }

    /// Number of caption downloads attempted
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of install checks performed
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    fn step_for(&self, job: &CaptionJob<'_>) -> Step {
        let scripted = self.by_url.lock().unwrap();
        let (auto, manual) = scripted
            .get(job.url)
            .map(|(a, m)| (a, m))
            .unwrap_or((&self.auto, &self.manual));
        match job.kind {
            CaptionKind::Auto => auto.clone(),
            CaptionKind::Manual => manual.clone(),
        }
    }
}

fn caption_path(job: &CaptionJob<'_>, suffix: &str) -> std::path::PathBuf {
    job.work_dir.join(format!("{}.en.{}", job.prefix, suffix))
}

#[async_trait]
impl CaptionTool for ScriptedTool {
    async fn probe(&self) -> Result<String, ToolError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.installed {
            Ok("2025.01.01".to_string())
        } else {
            Err(ToolError::NotInstalled("yt-dlp: No such file or directory".to_string()))
        }
    }

    async fn fetch(&self, job: &CaptionJob<'_>) -> Result<ToolOutput, ToolError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let failed = || ToolError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "ERROR: There are no subtitles for the requested languages".to_string(),
        };

        match self.step_for(job) {
            Step::Write(content) => {
                tokio::fs::write(caption_path(job, "vtt"), content).await?;
                Ok(Default::default())
            }
            Step::WriteAndFail(content) => {
                tokio::fs::write(caption_path(job, "vtt"), content).await?;
                Err(failed())
            }
            Step::Fail => Err(failed()),
            Step::Nothing => Ok(Default::default()),
            Step::Hang(delay) => {
                tokio::fs::write(caption_path(job, "vtt.part"), "WEBVTT\n").await?;
                tokio::time::sleep(delay).await;
                Err(ToolError::Timeout(delay.as_secs()))
            }
        }
    }
}

/// Application state wired to a scripted tool and an isolated work dir
pub fn test_state(tool: Arc<ScriptedTool>, work_dir: &std::path::Path) -> Arc<AppState> {
    let mut config = ServerConfig::default();
    config.extractor.work_dir = Some(work_dir.to_path_buf());
    Arc::new(AppState::with_tool(config, tool))
}

/// Names of all files left in `dir`
pub fn leftover_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
