pub mod palette;
pub mod pixelate;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use palette::{handle_palette, PaletteQuery, PaletteResponse, __path_handle_palette};
pub use pixelate::{handle_pixelate, __path_handle_pixelate};

/// Error body returned by all endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Error message
    pub error: String,
}
