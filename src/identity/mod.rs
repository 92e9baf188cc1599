//! Maps caller-presented tokens to announce identifiers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::announce::validate_identifier;

/// Turns an opaque token into the identifier whose announce sound the caller
/// may replace.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Failed to read tokens file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tokens file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Token in {path:?} maps to invalid identifier {identifier:?}")]
    InvalidIdentifier { path: PathBuf, identifier: String },
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TokensFile {
    tokens: HashMap<String, String>,
}

/// Resolver backed by a TOML file:
///
/// ```toml
/// [tokens]
/// "3f1c9a..." = "1234"
/// ```
#[derive(Debug, Default)]
pub struct TokenFileIdentityResolver {
    tokens: HashMap<String, String>,
}

impl TokenFileIdentityResolver {
    /// `None` (no tokens file configured) yields a resolver that knows no
    /// tokens. A configured file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, IdentityError> {
        let Some(path) = path else {
            warn!("No tokens file configured, every upload will be refused");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| IdentityError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TokensFile = toml::from_str(&content).map_err(|source| IdentityError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for identifier in file.tokens.values() {
            if validate_identifier(identifier).is_err() {
                return Err(IdentityError::InvalidIdentifier {
                    path: path.to_path_buf(),
                    identifier: identifier.clone(),
                });
            }
        }

        info!("Loaded {} tokens from {:?}", file.tokens.len(), path);
        Ok(Self {
            tokens: file.tokens,
        })
    }

    pub fn from_tokens<I, K, V>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityResolver for TokenFileIdentityResolver {
    fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}
