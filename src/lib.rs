//! Announce Sound Server Library
//!
//! Stores one short audio clip per identifier and serves it back over HTTP.
//! Exposed as a library so the binary and the integration tests share it.

pub mod announce;
pub mod config;
pub mod identity;
pub mod server;

// Re-export commonly used types for convenience
pub use announce::{AnnounceError, AnnounceStore, StoredAsset};
pub use config::{AppConfig, CliConfig, FileConfig, IngestionSettings};
pub use identity::{IdentityResolver, TokenFileIdentityResolver};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
