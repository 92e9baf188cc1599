//! Announce sound storage and ingestion.
//!
//! Assets live in a single flat directory as `<identifier>.<extension>`.
//! Uploads are materialized next to them under a dotted temp name, probed,
//! and renamed into place once every gate has passed.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::identifier::validate_identifier;
use super::prober::{DurationProber, SymphoniaProber};
use super::sniffer::sniff;
use super::{AnnounceError, AssetExtension, StoredAsset};
use crate::config::IngestionSettings;

/// Marker placed between the random part and the extension of candidates.
const CANDIDATE_MARKER: &str = ".tmp.";

pub struct AnnounceStore {
    sounds_dir: PathBuf,
    settings: IngestionSettings,
    prober: Arc<dyn DurationProber>,
}

impl AnnounceStore {
    /// Create a store probing durations with symphonia.
    pub fn new(sounds_dir: impl Into<PathBuf>, settings: IngestionSettings) -> Self {
        Self::with_prober(sounds_dir, settings, Arc::new(SymphoniaProber))
    }

    pub fn with_prober(
        sounds_dir: impl Into<PathBuf>,
        settings: IngestionSettings,
        prober: Arc<dyn DurationProber>,
    ) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
            settings,
            prober,
        }
    }

    pub fn settings(&self) -> &IngestionSettings {
        &self.settings
    }

    /// Create the sounds directory and sweep candidates left behind by a
    /// process that died mid-upload. Returns how many were removed.
    pub fn init(&self) -> Result<usize, AnnounceError> {
        fs::create_dir_all(&self.sounds_dir)?;

        let mut removed = 0;
        for entry in fs::read_dir(&self.sounds_dir)? {
            let path = entry?.path();
            if !is_candidate_path(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed stale candidate {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("Could not remove stale candidate {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            info!("Removed {} stale upload candidates", removed);
        }
        Ok(removed)
    }

    /// Path of the announce sound for `identifier`.
    ///
    /// Extensions are tried in [`AssetExtension::PROBE_ORDER`].
    pub fn resolve(&self, identifier: &str) -> Result<PathBuf, AnnounceError> {
        validate_identifier(identifier)?;

        for extension in AssetExtension::PROBE_ORDER {
            let path = self.asset_path(identifier, extension);
            if path.is_file() {
                debug!("Resolved {} to {}", identifier, path.display());
                return Ok(path);
            }
        }

        Err(AnnounceError::NotFound(identifier.to_string()))
    }

    /// Open the announce sound for `identifier`, looking extensions up in
    /// [`AssetExtension::PROBE_ORDER`].
    ///
    /// Lookup and open are one step: a file that vanishes between the two
    /// is skipped like a missing one. The returned handle keeps reading the
    /// same content even if an ingest replaces the asset afterwards.
    pub fn open(&self, identifier: &str) -> Result<(fs::File, AssetExtension), AnnounceError> {
        validate_identifier(identifier)?;

        for extension in AssetExtension::PROBE_ORDER {
            let path = self.asset_path(identifier, extension);
            let file = match fs::File::open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::NotFound || path.is_dir() => continue,
                Err(e) => return Err(e.into()),
            };
            if file.metadata()?.is_file() {
                debug!("Opened {} for {}", path.display(), identifier);
                return Ok((file, extension));
            }
        }

        Err(AnnounceError::NotFound(identifier.to_string()))
    }

    /// Validate `bytes` and, if they pass, make them the announce sound of
    /// `identifier`, replacing whatever was there before.
    ///
    /// Gates run cheapest first and stop at the first failure. Nothing is
    /// written to disk before the size and sniff gates pass, and the
    /// candidate file is removed on every failure.
    pub fn ingest(&self, identifier: &str, bytes: &[u8]) -> Result<StoredAsset, AnnounceError> {
        validate_identifier(identifier)?;

        let size = bytes.len();
        let max = self.settings.max_upload_bytes;
        if size > max {
            return Err(AnnounceError::PayloadTooLarge { size, max });
        }

        let sniffed = sniff(bytes);
        let extension = sniffed
            .extension()
            .ok_or_else(|| AnnounceError::UnsupportedType(sniffed.to_string()))?;
        debug!("Sniffed upload for {} as {}", identifier, sniffed);

        let candidate = self.materialize(identifier, extension, bytes)?;

        let duration_secs = self.prober.probe_duration(candidate.path())?;
        let max_secs = self.settings.max_duration_secs;
        if duration_secs > max_secs {
            return Err(AnnounceError::TooLong {
                duration_secs,
                max_secs,
            });
        }

        let path = self.replace(identifier, extension, candidate)?;
        info!(
            "Stored announce sound for {} ({}, {} bytes, {:.2}s)",
            identifier, extension, size, duration_secs
        );

        Ok(StoredAsset {
            identifier: identifier.to_string(),
            extension,
            path,
            size_bytes: size,
            duration_secs,
        })
    }

    fn asset_path(&self, identifier: &str, extension: AssetExtension) -> PathBuf {
        self.sounds_dir.join(extension.file_name(identifier))
    }

    /// Write the upload to `.<identifier>.<random>.tmp.<ext>`. The returned
    /// handle deletes the file when dropped.
    fn materialize(
        &self,
        identifier: &str,
        extension: AssetExtension,
        bytes: &[u8],
    ) -> Result<NamedTempFile, AnnounceError> {
        let prefix = format!(".{}.", identifier);
        let suffix = format!("{}{}", CANDIDATE_MARKER, extension);
        let mut candidate = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&self.sounds_dir)?;

        candidate.write_all(bytes)?;
        candidate.as_file().sync_all()?;
        debug!("Materialized candidate {}", candidate.path().display());
        Ok(candidate)
    }

    /// Drop assets stored under the other extensions, then rename the
    /// candidate over `<identifier>.<extension>`.
    ///
    /// A predecessor with the same extension is replaced by the rename
    /// itself. If the process dies between the removals and the rename the
    /// identifier is left without an asset until the next upload.
    fn replace(
        &self,
        identifier: &str,
        extension: AssetExtension,
        candidate: NamedTempFile,
    ) -> Result<PathBuf, AnnounceError> {
        for other in AssetExtension::PROBE_ORDER {
            if other == extension {
                continue;
            }
            let stale = self.asset_path(identifier, other);
            match fs::remove_file(&stale) {
                Ok(()) => debug!("Removed previous asset {}", stale.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let path = self.asset_path(identifier, extension);
        candidate
            .persist(&path)
            .map_err(|e| AnnounceError::Storage(e.error))?;
        sync_dir(&self.sounds_dir);

        Ok(path)
    }
}

fn is_candidate_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') && n.contains(CANDIDATE_MARKER))
        .unwrap_or(false)
}

/// Flush the directory entry so the rename survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        warn!("Could not sync {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
