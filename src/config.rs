//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, TranscriptError};

/// Caption extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path or name of the yt-dlp executable
    pub binary: String,

    /// Wall-clock limit for a single yt-dlp invocation in seconds
    pub timeout_secs: u64,

    /// Maximum bytes captured from stdout or stderr before the process is killed
    pub max_output_bytes: usize,

    /// Subtitle language requested from yt-dlp
    pub language: String,

    /// Subtitle file format (also the extension the locator matches)
    pub subtitle_format: String,

    /// Directory for request-scoped caption files
    pub work_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            timeout_secs: 30,
            max_output_bytes: 10 * 1024 * 1024,
            language: "en".to_string(),
            subtitle_format: "vtt".to_string(),
            work_dir: None,
        }
    }
}

impl ExtractorConfig {
    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the work directory, falling back to the system temp dir
    pub fn resolved_work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("yt-transcript"))
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Entries like `https://*.example.com` match any subdomain.
    pub allowed_origins: Vec<String>,

    /// Allow cookies and auth headers on cross-origin requests
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "https://*.vercel.app".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Extraction configuration
    pub extractor: ExtractorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors: CorsConfig::default(),
            extractor: ExtractorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Every valid override is applied even when another one is rejected;
    /// the first rejection is returned.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut outcome = Ok(());

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.port = p,
                Err(e) => {
                    outcome = Err(TranscriptError::Config(format!(
                        "invalid PORT {:?}: {}",
                        port, e
                    )))
                }
            }
        }

        if let Some(binary) = lookup("YTDLP_PATH").filter(|s| !s.trim().is_empty()) {
            self.extractor.binary = binary.trim().to_string();
        }

        if let Some(dir) = lookup("TRANSCRIPT_WORK_DIR").filter(|s| !s.trim().is_empty()) {
            self.extractor.work_dir = Some(PathBuf::from(dir.trim()));
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        outcome
    }
}
