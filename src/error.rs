use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixel_dither::DitherError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty request body")]
    EmptyBody,

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] DitherError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("Image too large: {width}x{height} (max {max} per side)")]
    ImageTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("GIF encode error: {0}")]
    GifEncode(String),

    #[error("Animation has no frames")]
    NoFrames,

    #[error("Render task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    fn status(&self) -> StatusCode {
        match self {
            RenderError::PngDecode(_) | RenderError::NoFrames => StatusCode::BAD_REQUEST,
            RenderError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RenderError::PngEncode(_)
            | RenderError::GifEncode(_)
            | RenderError::Task(_)
            | RenderError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::EmptyBody => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Render(e) => (e.status(), e.to_string()),
            ApiError::Pipeline(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
