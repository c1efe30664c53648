pub mod config;
pub mod render_params;

pub use config::{AppConfig, Limits, RenderDefaults};
pub use render_params::{clamp_color_count, PaletteSource, RenderParams, RenderQuery};
