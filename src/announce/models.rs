//! Data types shared by the announce sound pipeline.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Extension of a stored announce sound.
///
/// The declaration order is also the order in which assets are looked up,
/// see [`AssetExtension::PROBE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetExtension {
    Ogg,
    Mp3,
}

impl AssetExtension {
    /// Lookup order used when resolving an identifier. When more than one
    /// file exists for an identifier the first match wins.
    pub const PROBE_ORDER: [AssetExtension; 2] = [AssetExtension::Ogg, AssetExtension::Mp3];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetExtension::Ogg => "ogg",
            AssetExtension::Mp3 => "mp3",
        }
    }

    /// Content type used when serving the asset.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AssetExtension::Ogg => "audio/ogg",
            AssetExtension::Mp3 => "audio/mpeg",
        }
    }

    /// Final on-disk name of the asset for `identifier`.
    pub fn file_name(&self, identifier: &str) -> String {
        format!("{}.{}", identifier, self.as_str())
    }
}

impl fmt::Display for AssetExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An upload that passed every gate and is now the identifier's asset.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAsset {
    pub identifier: String,
    pub extension: AssetExtension,
    #[serde(skip)]
    pub path: PathBuf,
    pub size_bytes: usize,
    pub duration_secs: f64,
}
