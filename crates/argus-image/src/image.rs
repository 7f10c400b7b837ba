use crate::error::ImageError;

/// Image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels.
    pub width: usize,
    /// Height of the image in pixels.
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// An image with interleaved pixel data in row-major order with shape (H, W, C).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C>
where
    T: Copy + Default + num_traits::NumCast,
{
    /// Create a new image from pixel data.
    ///
    /// Fails if the data length does not equal `width * height * C`.
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.width * size.height * C {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * C,
            ));
        }
        Ok(Self { size, data })
    }

    /// Create an image filled with a constant value.
    pub fn from_size_val(size: ImageSize, val: T) -> Self {
        Self {
            data: vec![val; size.width * size.height * C],
            size,
        }
    }

    /// Create an image by copying a slice of pixel data.
    pub fn from_size_slice(size: ImageSize, data: &[T]) -> Result<Self, ImageError> {
        Self::new(size, data.to_vec())
    }

    /// The size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the image in pixels.
    #[inline]
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// The height of the image in pixels.
    #[inline]
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// The number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        C
    }

    /// The pixel data as a flat slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The pixel data as a mutable flat slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Read a single channel value at `(x, y)` with bounds checking.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError> {
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::PixelOutOfBounds(
                x,
                y,
                self.size.width,
                self.size.height,
            ));
        }
        if ch >= C {
            return Err(ImageError::ChannelOutOfBounds(ch, C));
        }
        Ok(self.data[(y * self.size.width + x) * C + ch])
    }

    /// Write a single channel value at `(x, y)` with bounds checking.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::PixelOutOfBounds(
                x,
                y,
                self.size.width,
                self.size.height,
            ));
        }
        if ch >= C {
            return Err(ImageError::ChannelOutOfBounds(ch, C));
        }
        self.data[(y * self.size.width + x) * C + ch] = val;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size_display() {
        let size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(size.to_string(), "ImageSize { width: 10, height: 20 }");
    }

    #[test]
    fn image_new_shape_checked() -> Result<(), ImageError> {
        let img = Image::<u8, 3>::new([4, 2].into(), vec![0u8; 4 * 2 * 3])?;
        assert_eq!(img.cols(), 4);
        assert_eq!(img.rows(), 2);
        assert_eq!(img.num_channels(), 3);

        let bad = Image::<u8, 3>::new([4, 2].into(), vec![0u8; 7]);
        assert!(matches!(bad, Err(ImageError::InvalidChannelShape(7, 24))));
        Ok(())
    }

    #[test]
    fn pixel_roundtrip() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val([3, 3].into(), 0);
        img.set_pixel(2, 1, 0, 128)?;
        assert_eq!(img.get_pixel(2, 1, 0)?, 128);
        assert!(img.get_pixel(3, 0, 0).is_err());
        Ok(())
    }
}
