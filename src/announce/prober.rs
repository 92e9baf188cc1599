//! Duration probing for materialized candidates.

use std::fs::File;
use std::io;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unrecognized container: {0}")]
    Unrecognized(String),

    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Unknown time base")]
    UnknownTimeBase,

    #[error("Container holds no audio packets")]
    NoAudioPackets,

    #[error("Malformed stream: {0}")]
    Malformed(String),
}

/// Reads the playback length of an audio file.
pub trait DurationProber: Send + Sync {
    /// Duration of the file at `path`, in seconds.
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError>;
}

/// [`DurationProber`] backed by symphonia's demuxers.
///
/// Walks every packet of the first audio track instead of trusting header
/// estimates: an MP3 without a Xing/Info frame carries no frame count and
/// a size based estimate is not precise enough to enforce a cap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaProber;

impl DurationProber for SymphoniaProber {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| match e {
                SymphoniaError::IoError(err) if err.kind() != io::ErrorKind::UnexpectedEof => {
                    ProbeError::Io(err)
                }
                other => ProbeError::Unrecognized(other.to_string()),
            })?;
        let mut reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(ProbeError::NoAudioTrack)?;
        let track_id = track.id;
        let header_frames = track.codec_params.n_frames;
        let time_base = track
            .codec_params
            .time_base
            .or_else(|| track.codec_params.sample_rate.map(|sr| TimeBase::new(1, sr)))
            .ok_or(ProbeError::UnknownTimeBase)?;

        let mut packets = 0usize;
        let mut total_ts: u64 = 0;
        loop {
            match reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != track_id {
                        continue;
                    }
                    packets += 1;
                    total_ts += packet.dur;
                }
                // End of stream. A cut-off trailing packet is not counted.
                Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    break
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(ProbeError::Malformed(e.to_string())),
            }
        }

        if packets == 0 {
            return Err(ProbeError::NoAudioPackets);
        }

        // Some mappers leave packet durations unset; fall back to the
        // container's own frame count.
        if total_ts == 0 {
            total_ts = header_frames.unwrap_or(0);
        }

        let time = time_base.calc_time(total_ts);
        let duration_secs = time.seconds as f64 + time.frac;
        debug!(
            "Probed {}: {} packets, {:.3}s",
            path.display(),
            packets,
            duration_secs
        );
        Ok(duration_secs)
    }
}
