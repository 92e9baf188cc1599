//! Content sniffing for uploaded sounds.
//!
//! Classification only looks at leading magic bytes. Whatever the client
//! claims about the upload (file name, content type) is never consulted.

use super::AssetExtension;
use std::fmt;

/// Number of leading bytes inspected when sniffing.
pub const SNIFF_PREFIX_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedType {
    /// MPEG audio, either behind an ID3v2 tag or starting on a frame.
    Mpeg,
    /// Ogg container, whatever codec it carries.
    Ogg,
    /// Anything else. Carries the detected MIME type when there was one.
    Unknown(Option<&'static str>),
}

impl SniffedType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            SniffedType::Mpeg => "audio/mpeg",
            SniffedType::Ogg => "audio/ogg",
            SniffedType::Unknown(Some(mime)) => mime,
            SniffedType::Unknown(None) => "application/octet-stream",
        }
    }

    /// Extension the upload will be stored under, if it is supported.
    pub fn extension(&self) -> Option<AssetExtension> {
        match self {
            SniffedType::Mpeg => Some(AssetExtension::Mp3),
            SniffedType::Ogg => Some(AssetExtension::Ogg),
            SniffedType::Unknown(_) => None,
        }
    }
}

impl fmt::Display for SniffedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SniffedType::Unknown(None) => f.write_str("unrecognized content"),
            other => f.write_str(other.mime_type()),
        }
    }
}

/// Classify `bytes` by signature.
pub fn sniff(bytes: &[u8]) -> SniffedType {
    let prefix = &bytes[..bytes.len().min(SNIFF_PREFIX_LEN)];

    match infer::get(prefix).map(|kind| kind.mime_type()) {
        Some("audio/mpeg") => SniffedType::Mpeg,
        // Ogg Opus has its own signature entry but is still an Ogg container.
        Some("audio/ogg") | Some("audio/opus") => SniffedType::Ogg,
        Some(other) => SniffedType::Unknown(Some(other)),
        None if is_mpeg_audio_frame(prefix) => SniffedType::Mpeg,
        None => SniffedType::Unknown(None),
    }
}

/// Frame sync check for MPEG audio streams without an ID3v2 tag.
///
/// The signature table only knows the MPEG-1 Layer III, no CRC sync word, so
/// this also accepts the other versions and layers as long as the header
/// fields are not reserved values.
fn is_mpeg_audio_frame(buf: &[u8]) -> bool {
    if buf.len() < 4 || buf[0] != 0xFF || buf[1] & 0xE0 != 0xE0 {
        return false;
    }

    let version = (buf[1] >> 3) & 0b11;
    let layer = (buf[1] >> 1) & 0b11;
    let bitrate_index = buf[2] >> 4;
    let sample_rate_index = (buf[2] >> 2) & 0b11;

    version != 0b01 && layer != 0b00 && bitrate_index != 0b1111 && sample_rate_index != 0b11
}
