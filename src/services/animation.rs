use pixel_dither::PixelBuffer;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::RenderError;
use crate::rendering::{AnimationEncoder, EncodeEvent, GifAnimationEncoder};

const EVENT_BUFFER: usize = 16;

/// Drives an [`AnimationEncoder`], forwarding progress and collecting the output
#[derive(Clone)]
pub struct AnimationService {
    encoder: Arc<dyn AnimationEncoder>,
}

impl AnimationService {
    pub fn new(encoder: Arc<dyn AnimationEncoder>) -> Self {
        Self { encoder }
    }

    /// Encode already-processed frames, reporting progress as it arrives.
    pub async fn encode(
        &self,
        frames: Vec<PixelBuffer>,
        delay_ms: u32,
        mut on_progress: impl FnMut(f32) + Send,
    ) -> Result<Vec<u8>, RenderError> {
        if frames.is_empty() {
            return Err(RenderError::NoFrames);
        }

        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let encode = self.encoder.encode(frames, delay_ms, tx);
        let collect = async {
            let mut output = None;
            while let Some(event) = rx.recv().await {
                match event {
                    EncodeEvent::Progress(fraction) => on_progress(fraction),
                    EncodeEvent::Complete(bytes) => output = Some(bytes),
                }
            }
            output
        };

        // The sender lives inside `encode`, so `collect` ends when it does
        let (result, output) = tokio::join!(encode, collect);
        result?;
        output.ok_or_else(|| RenderError::GifEncode("encoder finished without output".to_string()))
    }
}

impl Default for AnimationService {
    fn default() -> Self {
        Self::new(Arc::new(GifAnimationEncoder))
    }
}
