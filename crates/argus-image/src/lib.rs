#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Image and pixel error types.
pub mod error;

/// The image container type.
pub mod image;

/// Color space conversions.
pub mod color;

/// Drawing primitives for debug overlays.
pub mod draw;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

/// Single channel 8-bit image, the working format of the tracking pipeline.
pub type GrayImage = Image<u8, 1>;
