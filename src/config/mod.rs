mod file_config;

pub use file_config::{FileConfig, IngestionConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// Largest upload accepted as an announce sound, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500_000;

/// Longest accepted announce sound, in seconds.
pub const DEFAULT_MAX_DURATION_SECS: f64 = 5.0;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub sounds_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub tokens_file: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub max_duration_secs: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            sounds_dir: None,
            port: 3001,
            logging_level: RequestsLoggingLevel::default(),
            tokens_file: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sounds_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub tokens_file: Option<PathBuf>,
    pub ingestion: IngestionSettings,
}

/// Limits enforced on every upload.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionSettings {
    /// Uploads longer than this many bytes are rejected before touching disk.
    pub max_upload_bytes: usize,
    /// Uploads playing for longer than this are rejected after probing.
    pub max_duration_secs: f64,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let sounds_dir = file
            .sounds_dir
            .map(PathBuf::from)
            .or_else(|| cli.sounds_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("sounds_dir must be specified via --sounds-dir or in config file")
            })?;

        // Missing is fine, it gets created at startup.
        if sounds_dir.exists() && !sounds_dir.is_dir() {
            bail!("sounds_dir is not a directory: {:?}", sounds_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let tokens_file = file
            .tokens_file
            .map(PathBuf::from)
            .or_else(|| cli.tokens_file.clone());

        let ingestion_file = file.ingestion.unwrap_or_default();
        let ingestion = IngestionSettings {
            max_upload_bytes: ingestion_file
                .max_upload_bytes
                .unwrap_or(cli.max_upload_bytes),
            max_duration_secs: ingestion_file
                .max_duration_secs
                .unwrap_or(cli.max_duration_secs),
        };

        if ingestion.max_upload_bytes == 0 {
            bail!("max_upload_bytes must be greater than zero");
        }
        if !(ingestion.max_duration_secs.is_finite() && ingestion.max_duration_secs > 0.0) {
            bail!(
                "max_duration_secs must be a positive number, got {}",
                ingestion.max_duration_secs
            );
        }

        Ok(Self {
            sounds_dir,
            port,
            logging_level,
            tokens_file,
            ingestion,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
