pub mod animation;
pub mod pixelate_service;
pub mod result_cache;

pub use animation::AnimationService;
pub use pixelate_service::{PixelateService, RenderOutput};
pub use result_cache::{CachedRender, ResultCache};
