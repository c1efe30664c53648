use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::clamp_color_count;
use crate::services::PixelateService;

/// Query parameters for palette extraction
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaletteQuery {
    /// Maximum number of colors to extract, clamped to 2-16
    pub colors: Option<usize>,
}

/// Extracted palette, dark to light
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaletteResponse {
    /// Hex color codes ("#rrggbb"), sorted by luminance
    #[schema(example = json!(["#1a1c2c", "#5d275d", "#ef7d57"]))]
    pub colors: Vec<String>,
}

/// Extract a palette from an uploaded PNG
///
/// Runs median-cut over a downscaled sample of the image, then keeps the
/// most vivid, mutually distinct colors.
#[utoipa::path(
    post,
    path = "/api/palette",
    request_body(content = Vec<u8>, content_type = "image/png", description = "Source PNG image"),
    params(PaletteQuery),
    responses(
        (status = 200, description = "Extracted palette", body = PaletteResponse),
        (status = 400, description = "Invalid parameter or image", body = super::ErrorResponse),
        (status = 413, description = "Image too large", body = super::ErrorResponse),
    ),
    tag = "Palette"
)]
pub async fn handle_palette(
    State(service): State<Arc<PixelateService>>,
    query: Result<Query<PaletteQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<PaletteResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidParameter(e.body_text()))?;
    let color_count =
        clamp_color_count(query.colors.unwrap_or(service.config().defaults.color_count));

    let palette = service.extract_palette(body, color_count).await?;

    Ok(Json(PaletteResponse {
        colors: palette.to_hex_strings(),
    }))
}
