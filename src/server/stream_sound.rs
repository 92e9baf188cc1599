//! Audio streaming with single byte range support.

use super::error::ApiError;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, BufReader, SeekFrom},
};
use tokio_util::io::ReaderStream;
use tracing::debug;

const HEADER_BYTE_RANGE: &str = "Range";
const STREAM_BUFFER_SIZE: usize = 4096 * 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start_inclusive: Option<u64>,
    end_inclusive: Option<u64>,
}

/// A [`ByteRange`] resolved against a file length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedRange {
    Full,
    Partial { start: u64, end_inclusive: u64 },
    Unsatisfiable,
}

impl ByteRange {
    pub fn new(start_inclusive: Option<u64>, end_inclusive: Option<u64>) -> ByteRange {
        ByteRange {
            start_inclusive,
            end_inclusive,
        }
    }

    fn parse<S: AsRef<str>>(s: S) -> Option<ByteRange> {
        let v = s.as_ref().strip_prefix("bytes=")?;

        let parts: Vec<&str> = v.split('-').collect();
        if parts.len() != 2 {
            return None;
        }

        Some(ByteRange {
            start_inclusive: parts[0].trim().parse::<u64>().ok(),
            end_inclusive: parts[1].trim().parse::<u64>().ok(),
        })
    }

    fn from_headers(headers: &HeaderMap) -> Option<ByteRange> {
        headers
            .get(HEADER_BYTE_RANGE)
            .and_then(|x| x.to_str().ok())
            .and_then(ByteRange::parse)
    }

    /// `bytes=-n` is a suffix range: the last `n` bytes.
    fn resolve(self, file_length: u64) -> ResolvedRange {
        match (self.start_inclusive, self.end_inclusive) {
            (None, None) => ResolvedRange::Full,
            (None, Some(0)) => ResolvedRange::Unsatisfiable,
            (None, Some(suffix)) if file_length > 0 => ResolvedRange::Partial {
                start: file_length.saturating_sub(suffix),
                end_inclusive: file_length - 1,
            },
            (Some(start), None) if start < file_length => ResolvedRange::Partial {
                start,
                end_inclusive: file_length - 1,
            },
            (Some(start), Some(end)) if start <= end && start < file_length => {
                ResolvedRange::Partial {
                    start,
                    end_inclusive: end.min(file_length - 1),
                }
            }
            _ => ResolvedRange::Unsatisfiable,
        }
    }
}

/// Stream the already opened `file` as `content_type`, honoring a `Range`
/// header if present.
pub async fn stream_file(
    mut file: File,
    content_type: &str,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let file_length = file
        .metadata()
        .await
        .map_err(|_| ApiError::internal("Could not read announce sound."))?
        .len();

    let range = ByteRange::from_headers(headers)
        .map(|r| r.resolve(file_length))
        .unwrap_or(ResolvedRange::Full);
    debug!("Streaming {} bytes as {:?}", file_length, range);

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    let response = match range {
        ResolvedRange::Full => {
            let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file);
            builder
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, file_length)
                .body(Body::from_stream(ReaderStream::with_capacity(
                    reader,
                    STREAM_BUFFER_SIZE,
                )))
        }
        ResolvedRange::Partial {
            start,
            end_inclusive,
        } => {
            file.seek(SeekFrom::Start(start))
                .await
                .map_err(|_| ApiError::internal("Could not read announce sound."))?;
            let chunk_size = end_inclusive - start + 1;
            let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file).take(chunk_size);
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end_inclusive, file_length),
                )
                .header(header::CONTENT_LENGTH, chunk_size)
                .body(Body::from_stream(ReaderStream::with_capacity(
                    reader,
                    STREAM_BUFFER_SIZE,
                )))
        }
        ResolvedRange::Unsatisfiable => {
            let mut response = ApiError::new(
                StatusCode::RANGE_NOT_SATISFIABLE,
                format!("Requested range is outside of the {} byte sound.", file_length),
            )
            .into_response();
            let content_range = HeaderValue::from_str(&format!("bytes */{}", file_length))
                .map_err(|e| ApiError::internal(format!("Could not build response: {}", e)))?;
            response
                .headers_mut()
                .insert(header::CONTENT_RANGE, content_range);
            return Ok(response);
        }
    };

    response.map_err(|e| ApiError::internal(format!("Could not build response: {}", e)))
}
