//! Animated GIF output for processed frame sequences.
//!
//! GIF holds at most 256 colors per table. Frames rendered against a palette
//! share one global table built from the colors actually used; anything
//! richer (pixelation without palette reduction) is quantized per frame.

use async_trait::async_trait;
use gif::{Encoder, Frame, Repeat};
use pixel_dither::{Color, PixelBuffer};
use std::borrow::Cow;
use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::error::RenderError;

/// NeuQuant sampling speed for frames that need per-frame quantization
const QUANTIZE_SPEED: i32 = 10;

/// Progress and completion notifications from an animation encoder
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeEvent {
    /// Fraction of frames written so far, in (0, 1]
    Progress(f32),
    /// Final encoded bytes; always the last event of a successful run
    Complete(Vec<u8>),
}

/// Encodes an ordered, same-size frame sequence into an animated image.
///
/// Events are delivered on `events` while encoding runs, so the receiver
/// must be drained concurrently with the call.
#[async_trait]
pub trait AnimationEncoder: Send + Sync {
    async fn encode(
        &self,
        frames: Vec<PixelBuffer>,
        delay_ms: u32,
        events: mpsc::Sender<EncodeEvent>,
    ) -> Result<(), RenderError>;
}

/// Looping GIF encoder running on the blocking thread pool
#[derive(Debug, Default, Clone, Copy)]
pub struct GifAnimationEncoder;

#[async_trait]
impl AnimationEncoder for GifAnimationEncoder {
    async fn encode(
        &self,
        frames: Vec<PixelBuffer>,
        delay_ms: u32,
        events: mpsc::Sender<EncodeEvent>,
    ) -> Result<(), RenderError> {
        let progress = events.clone();
        let bytes = tokio::task::spawn_blocking(move || {
            encode_gif(&frames, delay_ms, |fraction| {
                // A dropped receiver only means nobody is watching
                let _ = progress.blocking_send(EncodeEvent::Progress(fraction));
            })
        })
        .await
        .map_err(|e| RenderError::Task(format!("GIF encode task failed: {e}")))??;

        tracing::debug!(bytes = bytes.len(), "Animation encoded");
        let _ = events.send(EncodeEvent::Complete(bytes)).await;
        Ok(())
    }
}

/// Encode frames as an infinitely looping GIF.
///
/// `progress` is called after each frame is written.
pub fn encode_gif(
    frames: &[PixelBuffer],
    delay_ms: u32,
    mut progress: impl FnMut(f32),
) -> Result<Vec<u8>, RenderError> {
    let first = frames.first().ok_or(RenderError::NoFrames)?;
    let (w, h) = first.dimensions();
    let width = gif_dimension(w)?;
    let height = gif_dimension(h)?;

    // GIF delays are in hundredths of a second
    let delay = (delay_ms / 10).min(u16::MAX as u32) as u16;
    let table = ColorTable::build(frames);

    let mut output = Vec::new();
    {
        let global: &[u8] = table.as_ref().map(|t| t.rgb.as_slice()).unwrap_or_default();
        let mut encoder = Encoder::new(&mut output, width, height, global)
            .map_err(|e| RenderError::GifEncode(e.to_string()))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| RenderError::GifEncode(e.to_string()))?;

        for (i, frame) in frames.iter().enumerate() {
            if frame.dimensions() != (w, h) {
                return Err(RenderError::GifEncode(format!(
                    "frame {i} is {}x{}, expected {w}x{h}",
                    frame.width(),
                    frame.height()
                )));
            }

            let mut gif_frame = match &table {
                Some(table) => Frame {
                    width,
                    height,
                    buffer: Cow::Owned(table.indices(frame)),
                    ..Frame::default()
                },
                None => Frame::from_rgb_speed(width, height, &frame.to_rgb_bytes(), QUANTIZE_SPEED),
            };
            gif_frame.delay = delay;

            encoder
                .write_frame(&gif_frame)
                .map_err(|e| RenderError::GifEncode(e.to_string()))?;
            progress((i + 1) as f32 / frames.len() as f32);
        }
    }

    Ok(output)
}

fn gif_dimension(value: usize) -> Result<u16, RenderError> {
    u16::try_from(value)
        .map_err(|_| RenderError::GifEncode(format!("dimension {value} exceeds GIF limit")))
}

/// Shared color table for frames using at most 256 distinct colors
struct ColorTable {
    /// RGB triples padded to a power-of-two entry count
    rgb: Vec<u8>,
    lookup: HashMap<Color, u8>,
}

impl ColorTable {
    /// Collect colors in first-seen order; `None` if more than 256 are used.
    fn build(frames: &[PixelBuffer]) -> Option<Self> {
        let mut lookup = HashMap::new();
        let mut rgb = Vec::new();
        for &color in frames.iter().flat_map(|f| f.pixels()) {
            if lookup.contains_key(&color) {
                continue;
            }
            if lookup.len() == 256 {
                return None;
            }
            lookup.insert(color, lookup.len() as u8);
            rgb.extend_from_slice(&color.to_bytes());
        }

        // GIF tables are at least 2 entries, always a power of two
        let padded = lookup.len().max(2).next_power_of_two();
        rgb.resize(padded * 3, 0);
        Some(Self { rgb, lookup })
    }

    fn indices(&self, frame: &PixelBuffer) -> Vec<u8> {
        frame
            .pixels()
            .iter()
            .map(|c| self.lookup.get(c).copied().unwrap_or(0))
            .collect()
    }
}
