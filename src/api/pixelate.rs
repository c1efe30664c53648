use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{RenderParams, RenderQuery};
use crate::services::{PixelateService, ResultCache};

/// Header reporting whether the result came from the cache
pub const X_CACHE: &str = "x-cache";

/// Header listing the palette the image was rendered with
pub const X_PALETTE: &str = "x-palette";

/// Convert an uploaded PNG to pixel art
///
/// The image is downsampled to `pixel_size` percent, mapped onto the palette
/// with the chosen dithering algorithm, and scaled back to its original size.
#[utoipa::path(
    post,
    path = "/api/pixelate",
    request_body(content = Vec<u8>, content_type = "image/png", description = "Source PNG image"),
    params(RenderQuery),
    responses(
        (status = 200, description = "Pixel-art PNG", content_type = "image/png"),
        (status = 304, description = "Unchanged since the ETag in If-None-Match"),
        (status = 400, description = "Invalid parameter or image", body = super::ErrorResponse),
        (status = 413, description = "Image too large", body = super::ErrorResponse),
    ),
    tag = "Pixelate"
)]
pub async fn handle_pixelate(
    State(service): State<Arc<PixelateService>>,
    query: Result<Query<RenderQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidParameter(e.body_text()))?;
    let params = RenderParams::resolve(&query, &service.config().defaults)?;

    if body.is_empty() {
        return Err(ApiError::EmptyBody);
    }

    let etag = format!("\"{}\"", ResultCache::key(&body, &params.fingerprint()));
    if etag_matches(&headers, &etag) {
        tracing::debug!(%etag, "Client copy is current");
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    tracing::debug!(
        pixel_size = params.pixel_size,
        algorithm = %params.algorithm,
        palette_mode = %params.palette_mode,
        input_bytes = body.len(),
        "Pixelate request"
    );

    let output = service.render_png(body, params).await?;

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, output.png_bytes.len().to_string()),
            (header::ETAG, etag),
        ],
        output.png_bytes,
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(
        X_CACHE,
        HeaderValue::from_static(if output.cache_hit { "hit" } else { "miss" }),
    );
    if let Ok(value) = HeaderValue::from_str(&output.palette.join(",")) {
        headers.insert(X_PALETTE, value);
    }

    Ok(response)
}

/// True if `If-None-Match` lists `etag` (or `*`).
fn etag_matches(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.split(',')
                .map(str::trim)
                .any(|tag| tag == "*" || tag.trim_start_matches("W/") == etag)
        })
}
