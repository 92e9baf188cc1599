use super::prober::ProbeError;
use thiserror::Error;

/// Errors returned by [`AnnounceStore`](super::AnnounceStore).
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("Announce sound for user ID \"{0}\" not found!")]
    NotFound(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("File too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Invalid audio: {0}")]
    InvalidAudio(#[source] ProbeError),

    #[error("Sound too long: {duration_secs:.2}s (max: {max_secs:.2}s)")]
    TooLong { duration_secs: f64, max_secs: f64 },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Flat classification of [`AnnounceError`], for callers that only need to
/// know which gate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceErrorKind {
    NotFound,
    InvalidIdentifier,
    PayloadTooLarge,
    UnsupportedType,
    InvalidAudio,
    TooLong,
    Storage,
}

impl AnnounceError {
    pub fn kind(&self) -> AnnounceErrorKind {
        match self {
            AnnounceError::NotFound(_) => AnnounceErrorKind::NotFound,
            AnnounceError::InvalidIdentifier(_) => AnnounceErrorKind::InvalidIdentifier,
            AnnounceError::PayloadTooLarge { .. } => AnnounceErrorKind::PayloadTooLarge,
            AnnounceError::UnsupportedType(_) => AnnounceErrorKind::UnsupportedType,
            AnnounceError::InvalidAudio(_) => AnnounceErrorKind::InvalidAudio,
            AnnounceError::TooLong { .. } => AnnounceErrorKind::TooLong,
            AnnounceError::Storage(_) => AnnounceErrorKind::Storage,
        }
    }
}

impl From<ProbeError> for AnnounceError {
    /// I/O failures while reading the candidate back are storage problems,
    /// everything else means the bytes are not the audio they claim to be.
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Io(io) => AnnounceError::Storage(io),
            other => AnnounceError::InvalidAudio(other),
        }
    }
}
