use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use announce_sound_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_MAX_DURATION_SECS, DEFAULT_MAX_UPLOAD_BYTES,
};
use announce_sound_server::{
    run_server, AnnounceStore, RequestsLoggingLevel, ServerConfig, TokenFileIdentityResolver,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the announce sounds. Created if missing.
    #[clap(long, value_parser = parse_path)]
    pub sounds_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Largest accepted upload, in bytes.
    #[clap(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Longest accepted sound, in seconds.
    #[clap(long, default_value_t = DEFAULT_MAX_DURATION_SECS)]
    pub max_duration_secs: f64,

    /// TOML file mapping upload tokens to identifiers.
    #[clap(long, value_parser = parse_path)]
    pub tokens_file: Option<PathBuf>,

    /// TOML config file. Values there override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            sounds_dir: self.sounds_dir.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            tokens_file: self.tokens_file.clone(),
            max_upload_bytes: self.max_upload_bytes,
            max_duration_secs: self.max_duration_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening sounds directory at {:?}...", config.sounds_dir);
    let store = AnnounceStore::new(&config.sounds_dir, config.ingestion.clone());
    store
        .init()
        .with_context(|| format!("Failed to prepare sounds directory {:?}", config.sounds_dir))?;
    info!(
        "Accepting uploads up to {} bytes and {:.2}s",
        config.ingestion.max_upload_bytes, config.ingestion.max_duration_secs
    );

    let identity_resolver = TokenFileIdentityResolver::load(config.tokens_file.as_deref())?;

    info!("Ready to serve at port {}!", config.port);
    run_server(
        ServerConfig {
            requests_logging_level: config.logging_level,
            port: config.port,
        },
        Arc::new(store),
        Arc::new(identity_resolver),
    )
    .await
}
