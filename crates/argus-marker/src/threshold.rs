use argus_image::{GrayImage, ImageError};

use crate::errors::MarkerError;

/// Output value for a pixel classified as dark.
pub const BLACK: u8 = 0;
/// Output value for a pixel in a low-contrast tile.
pub const SKIP: u8 = 127;
/// Output value for a pixel classified as bright.
pub const WHITE: u8 = 255;

/// Binarize a grayscale image with a tiled adaptive threshold.
///
/// The image is split into `tile_size` x `tile_size` tiles; each tile is
/// thresholded at the midpoint of the min/max over itself and its four
/// neighbors, so the threshold tracks local lighting. Tiles whose local
/// contrast stays below `min_contrast` are marked [`SKIP`] and ignored by
/// the segmenter.
pub fn adaptive_threshold(
    src: &GrayImage,
    dst: &mut GrayImage,
    tile_size: usize,
    min_contrast: u8,
) -> Result<(), MarkerError> {
    if src.size() != dst.size() {
        return Err(
            ImageError::InvalidImageSize(src.cols(), src.rows(), dst.cols(), dst.rows()).into(),
        );
    }
    if tile_size < 2 {
        return Err(MarkerError::InvalidTileSize(tile_size));
    }
    if src.cols() < tile_size || src.rows() < tile_size {
        return Err(MarkerError::ImageTooSmall {
            width: src.cols(),
            height: src.rows(),
            tile_size,
        });
    }

    let width = src.cols();
    let height = src.rows();
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    let tiles_x = width.div_ceil(tile_size);
    let tiles_y = height.div_ceil(tile_size);

    let mut tile_min = vec![u8::MAX; tiles_x * tiles_y];
    let mut tile_max = vec![u8::MIN; tiles_x * tiles_y];

    // per-tile grayscale extrema
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x_end = ((tx + 1) * tile_size).min(width);
            let y_end = ((ty + 1) * tile_size).min(height);

            let (mut lo, mut hi) = (u8::MAX, u8::MIN);
            for y in ty * tile_size..y_end {
                for &px in &src_data[y * width + tx * tile_size..y * width + x_end] {
                    lo = lo.min(px);
                    hi = hi.max(px);
                }
            }
            tile_min[ty * tiles_x + tx] = lo;
            tile_max[ty * tiles_x + tx] = hi;
        }
    }

    // binarize against the extrema of the tile and its 4-neighborhood
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let idx = ty * tiles_x + tx;
            let mut lo = tile_min[idx];
            let mut hi = tile_max[idx];

            if tx + 1 < tiles_x {
                lo = lo.min(tile_min[idx + 1]);
                hi = hi.max(tile_max[idx + 1]);
            }
            if tx > 0 {
                lo = lo.min(tile_min[idx - 1]);
                hi = hi.max(tile_max[idx - 1]);
            }
            if ty + 1 < tiles_y {
                lo = lo.min(tile_min[idx + tiles_x]);
                hi = hi.max(tile_max[idx + tiles_x]);
            }
            if ty > 0 {
                lo = lo.min(tile_min[idx - tiles_x]);
                hi = hi.max(tile_max[idx - tiles_x]);
            }

            let x_end = ((tx + 1) * tile_size).min(width);
            let y_end = ((ty + 1) * tile_size).min(height);

            if hi - lo < min_contrast {
                for y in ty * tile_size..y_end {
                    dst_data[y * width + tx * tile_size..y * width + x_end].fill(SKIP);
                }
                continue;
            }

            let thresh = lo / 2 + hi / 2;
            for y in ty * tile_size..y_end {
                let row = y * width;
                for i in row + tx * tile_size..row + x_end {
                    dst_data[i] = if src_data[i] > thresh { WHITE } else { BLACK };
                }
            }
        }
    }

    Ok(())
}
