pub mod gif_encoder;
pub mod png_codec;

pub use gif_encoder::{encode_gif, AnimationEncoder, EncodeEvent, GifAnimationEncoder};
pub use png_codec::{decode_png, encode_png};
