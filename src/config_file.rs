//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section except
//! `[server]` is optional; missing keys fall back to the defaults in
//! [`crate::config`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{CorsConfig, ExtractorConfig, LoggingConfig, ServerConfig};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// CORS settings
    pub cors: Option<CorsSettings>,
    /// yt-dlp settings
    pub extractor: Option<ExtractorSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins, wildcard subdomains written as `https://*.example.com`
    pub allowed_origins: Vec<String>,
    /// Allow credentials for allowed origins
    pub allow_credentials: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// yt-dlp executable
    pub binary: Option<String>,
    /// Per-invocation timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Output cap in MB
    pub max_output_mb: Option<usize>,
    /// Subtitle language
    pub language: Option<String>,
    /// Directory for temporary caption files
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let cors = CorsConfig::default();
        let extractor = ExtractorConfig::default();
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            cors: Some(CorsSettings {
                allowed_origins: cors.allowed_origins,
                allow_credentials: Some(cors.allow_credentials),
            }),
            extractor: Some(ExtractorSettings {
                binary: Some(extractor.binary),
                timeout_secs: Some(extractor.timeout_secs),
                max_output_mb: Some(extractor.max_output_bytes / (1024 * 1024)),
                language: Some(extractor.language),
                work_dir: None,
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let cors_defaults = CorsConfig::default();
        let cors = match self.cors {
            Some(c) => CorsConfig {
                allowed_origins: c.allowed_origins,
                allow_credentials: c
                    .allow_credentials
                    .unwrap_or(cors_defaults.allow_credentials),
            },
            None => cors_defaults,
        };

        let mut extractor = ExtractorConfig::default();
        if let Some(e) = self.extractor {
            if let Some(binary) = e.binary {
                extractor.binary = binary;
            }
            if let Some(secs) = e.timeout_secs {
                extractor.timeout_secs = secs;
            }
            if let Some(mb) = e.max_output_mb {
                extractor.max_output_bytes = mb * 1024 * 1024;
            }
            if let Some(language) = e.language {
                extractor.language = language;
            }
            extractor.work_dir = e.work_dir;
        }

        let logging = self
            .logging
            .map(|l| LoggingConfig {
                level: l.level,
                format: l.format.unwrap_or_else(|| "pretty".to_string()),
            })
            .unwrap_or_default();

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors,
            extractor,
            logging,
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
