/// An error type for image construction and pixel access.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// The pixel data length does not match the image dimensions.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Two images that must agree in size do not.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// A pixel coordinate is outside the image bounds.
    #[error("Pixel coordinate ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelOutOfBounds(usize, usize, usize, usize),

    /// A channel index is outside the image channel count.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelOutOfBounds(usize, usize),
}
