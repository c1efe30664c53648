//! Public error surface for the pixel-dither crate.
//!
//! [`DitherError`] unifies the crate's error types for `?` propagation in
//! application code.

mod error;

pub use error::DitherError;
