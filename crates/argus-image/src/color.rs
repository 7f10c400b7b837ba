use crate::{Image, ImageError};
use rayon::prelude::*;

/// Convert an RGB8 image to grayscale using fixed-point BT.601 luma weights.
///
/// The source and destination must have the same size.
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let src_data = src.as_slice();
    dst.as_slice_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, dst_pixel)| {
            let r = src_data[i * 3] as u16;
            let g = src_data[i * 3 + 1] as u16;
            let b = src_data[i * 3 + 2] as u16;
            *dst_pixel = ((r * 77 + g * 150 + b * 29) >> 8) as u8;
        });

    Ok(())
}

/// Replicate a grayscale image into the three channels of an RGB8 image.
pub fn rgb_from_gray_u8(src: &Image<u8, 1>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let src_data = src.as_slice();
    dst.as_slice_mut()
        .par_chunks_exact_mut(3)
        .enumerate()
        .for_each(|(i, dst_pixel)| {
            dst_pixel.fill(src_data[i]);
        });

    Ok(())
}
