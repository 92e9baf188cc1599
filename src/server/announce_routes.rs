//! Announce sound endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use tokio::fs::File;
use tracing::{error, info};

use super::error::ApiError;
use super::session::Caller;
use super::state::{GuardedAnnounceStore, ServerState};
use super::stream_sound::stream_file;

/// GET /sound/{identifier} - Stream the announce sound of `identifier`
async fn get_sound(
    State(store): State<GuardedAnnounceStore>,
    Path(identifier): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let lookup_id = identifier.clone();
    let (file, extension) = tokio::task::spawn_blocking(move || store.open(&lookup_id))
        .await
        .map_err(|e| {
            error!("Lookup task failed: {}", e);
            ApiError::internal("Could not read announce sound.")
        })??;

    info!("Serving announce sound for {} ({})", identifier, extension);
    stream_file(File::from_std(file), extension.mime_type(), &headers).await
}

/// PUT /sound - Replace the caller's announce sound with the request body
async fn put_sound(
    caller: Caller,
    State(store): State<GuardedAnnounceStore>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let max = store.settings().max_upload_bytes;
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File too large (max: {} bytes)", max),
            ));
        }
        Err(rejection) => {
            return Err(ApiError::new(rejection.status(), rejection.body_text()));
        }
    };

    let identifier = caller.identifier;
    let location = format!("/announce/sound/{}", identifier);

    // Sniffing, probing and the rename are all blocking filesystem work.
    let asset = tokio::task::spawn_blocking(move || store.ingest(&identifier, &body))
        .await
        .map_err(|e| {
            error!("Ingest task failed: {}", e);
            ApiError::internal("Upload processing failed.")
        })?
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(asset),
    )
        .into_response())
}

/// Build the announce routes.
///
/// - GET /sound/{identifier} - Fetch a sound, no token required
/// - PUT /sound - Replace the caller's own sound
///
/// The body limit sits one byte above the ingestion cap so that the
/// store sees uploads of exactly the cap and applies the boundary itself.
pub fn announce_routes(max_upload_bytes: usize) -> Router<ServerState> {
    let upload_route = Router::new()
        .route("/sound", put(put_sound))
        .layer(DefaultBodyLimit::max(max_upload_bytes.saturating_add(1)));

    Router::new()
        .merge(upload_route)
        .route("/sound/{identifier}", get(get_sound))
}
