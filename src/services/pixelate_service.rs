use axum::body::Bytes;
use pixel_dither::{Palette, PixelBuffer};
use std::sync::Arc;
use std::time::Instant;

use super::animation::AnimationService;
use super::result_cache::{CachedRender, ResultCache};
use crate::error::{ApiError, RenderError};
use crate::models::{AppConfig, PaletteSource, RenderParams};
use crate::rendering::{decode_png, encode_png};

/// A rendered PNG plus the metadata needed to serve it
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub png_bytes: Bytes,
    /// Cache key of the result, usable as a strong ETag
    pub etag: String,
    /// Palette the image was rendered with, as hex strings
    pub palette: Vec<String>,
    pub cache_hit: bool,
}

/// Runs the pixel-art pipeline on uploaded images.
///
/// All image work happens in `spawn_blocking` so CPU-heavy dithering and
/// PNG optimization never stall the async runtime.
pub struct PixelateService {
    config: Arc<AppConfig>,
    cache: ResultCache,
    animation: AnimationService,
}

impl PixelateService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_animation(config, AnimationService::default())
    }

    pub fn with_animation(config: Arc<AppConfig>, animation: AnimationService) -> Self {
        let cache = ResultCache::new(config.limits.cache_entries);
        Self {
            config,
            cache,
            animation,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decode, pixelate and re-encode one PNG, answering from the cache when possible.
    pub async fn render_png(
        &self,
        input: Bytes,
        params: RenderParams,
    ) -> Result<RenderOutput, ApiError> {
        if input.is_empty() {
            return Err(ApiError::EmptyBody);
        }

        let key = ResultCache::key(&input, &params.fingerprint());
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(etag = %key, generated_at = %hit.generated_at, "Serving cached render");
            return Ok(RenderOutput {
                png_bytes: hit.png_bytes,
                etag: key,
                palette: hit.palette,
                cache_hit: true,
            });
        }

        let start = Instant::now();
        let max_dimension = self.config.limits.max_dimension;
        let (png_bytes, palette) = tokio::task::spawn_blocking(move || {
            let image = decode_png(&input, max_dimension)?;
            let palette = params.palette.resolve(&image);
            let output = params.pipeline(palette.clone()).process_image(&image);
            let png = encode_png(&output, params.dither.then_some(&palette))?;
            Ok::<_, RenderError>((png, palette))
        })
        .await
        .map_err(|e| RenderError::Task(format!("Render task failed: {e}")))??;

        let png_bytes = Bytes::from(png_bytes);
        let palette = palette.to_hex_strings();
        tracing::info!(
            etag = %key,
            bytes = png_bytes.len(),
            colors = palette.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered pixel art"
        );

        self.cache
            .store(
                key.clone(),
                CachedRender {
                    png_bytes: png_bytes.clone(),
                    palette: palette.clone(),
                    generated_at: chrono::Utc::now(),
                },
            )
            .await;

        Ok(RenderOutput {
            png_bytes,
            etag: key,
            palette,
            cache_hit: false,
        })
    }

    /// Extract a palette of up to `color_count` colors from a PNG.
    pub async fn extract_palette(
        &self,
        input: Bytes,
        color_count: usize,
    ) -> Result<Palette, ApiError> {
        if input.is_empty() {
            return Err(ApiError::EmptyBody);
        }

        let max_dimension = self.config.limits.max_dimension;
        let palette = tokio::task::spawn_blocking(move || {
            let image = decode_png(&input, max_dimension)?;
            Ok::<_, RenderError>(PaletteSource::Auto { color_count }.resolve(&image))
        })
        .await
        .map_err(|e| RenderError::Task(format!("Extraction task failed: {e}")))??;

        tracing::debug!(requested = color_count, extracted = palette.len(), "Extracted palette");
        Ok(palette)
    }

    /// Pixelate a sequence of PNG frames and encode them as an animation.
    ///
    /// An automatic palette is extracted from the first frame and shared by
    /// all frames so colors stay stable across the animation.
    pub async fn render_animation(
        &self,
        inputs: Vec<Vec<u8>>,
        params: RenderParams,
        delay_ms: u32,
        on_progress: impl FnMut(f32) + Send,
    ) -> Result<Vec<u8>, ApiError> {
        if inputs.is_empty() {
            return Err(RenderError::NoFrames.into());
        }

        let max_dimension = self.config.limits.max_dimension;
        let frames = tokio::task::spawn_blocking(move || {
            let images = inputs
                .iter()
                .map(|bytes| decode_png(bytes, max_dimension))
                .collect::<Result<Vec<_>, _>>()?;
            let palette = params.palette.resolve(&images[0]);
            let buffers: Vec<PixelBuffer> = images.iter().map(|i| i.to_pixel_buffer()).collect();
            let frames = params.pipeline(palette).process_frames(&buffers)?;
            Ok::<_, ApiError>(frames)
        })
        .await
        .map_err(|e| RenderError::Task(format!("Frame processing task failed: {e}")))??;

        tracing::info!(frames = frames.len(), delay_ms, "Encoding animation");
        Ok(self.animation.encode(frames, delay_ms, on_progress).await?)
    }
}
