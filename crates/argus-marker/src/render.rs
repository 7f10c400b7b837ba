use argus_image::{GrayImage, ImageSize};

use crate::errors::MarkerError;
use crate::family::TagFamily;

/// Draw a marker into an existing image.
///
/// The marker is rendered axis-aligned with its quiet zone, covering
/// `total_width * scale` pixels per side starting at `origin` (top-left,
/// in pixels). Cells outside the border square render white, the border
/// ring black, and payload cells according to the code word.
pub fn draw_marker(
    dst: &mut GrayImage,
    family: &TagFamily,
    id: usize,
    scale: usize,
    origin: (usize, usize),
) -> Result<(), MarkerError> {
    let code = family.code_for_id(id)?;
    let extent = family.total_width * scale;
    let (ox, oy) = origin;
    if ox + extent > dst.cols() || oy + extent > dst.rows() {
        return Err(argus_image::ImageError::PixelOutOfBounds(
            ox + extent,
            oy + extent,
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let margin = (family.total_width - family.width_at_border) / 2;
    for cy in 0..family.total_width {
        for cx in 0..family.total_width {
            let value = cell_value(family, code, cx, cy, margin);
            for py in 0..scale {
                for px in 0..scale {
                    dst.set_pixel(ox + cx * scale + px, oy + cy * scale + py, 0, value)?;
                }
            }
        }
    }
    Ok(())
}

/// Render a marker on a white canvas with an extra quiet border.
///
/// Useful for generating printable tags and synthetic test frames.
pub fn marker_image(
    family: &TagFamily,
    id: usize,
    scale: usize,
    padding: usize,
) -> Result<GrayImage, MarkerError> {
    let side = family.total_width * scale + 2 * padding;
    let mut img = GrayImage::from_size_val(
        ImageSize {
            width: side,
            height: side,
        },
        255u8,
    );
    draw_marker(&mut img, family, id, scale, (padding, padding))?;
    Ok(img)
}

fn cell_value(family: &TagFamily, code: u64, cx: usize, cy: usize, margin: usize) -> u8 {
    // quiet zone outside the border square
    if cx < margin
        || cy < margin
        || cx >= margin + family.width_at_border
        || cy >= margin + family.width_at_border
    {
        return 255;
    }
    let bx = cx - margin;
    let by = cy - margin;
    // black border ring
    if bx == 0 || by == 0 || bx == family.width_at_border - 1 || by == family.width_at_border - 1 {
        return 0;
    }
    // payload cell
    for i in 0..family.nbits {
        if family.bit_x[i] as usize == bx && family.bit_y[i] as usize == by {
            return if family.bit_is_white(code, i) { 255 } else { 0 };
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_marker_has_black_border() -> Result<(), MarkerError> {
        let family = TagFamily::tag16_h5();
        let img = marker_image(&family, 0, 4, 8)?;

        // border square starts one cell ring inside the tag
        let border_px = 8 + 4; // padding + one quiet cell
        assert_eq!(img.get_pixel(border_px, border_px, 0)?, 0);
        assert_eq!(img.get_pixel(border_px - 1, border_px - 1, 0)?, 255);
        Ok(())
    }

    #[test]
    fn payload_cells_follow_the_code_word() -> Result<(), MarkerError> {
        let family = TagFamily::tag16_h5();
        let id = 5;
        let code = family.code_for_id(id)?;
        let scale = 4;
        let img = marker_image(&family, id, scale, 0)?;

        let margin = (family.total_width - family.width_at_border) / 2;
        for i in 0..family.nbits {
            let cx = (family.bit_x[i] as usize + margin) * scale + scale / 2;
            let cy = (family.bit_y[i] as usize + margin) * scale + scale / 2;
            let expected = if family.bit_is_white(code, i) { 255 } else { 0 };
            assert_eq!(img.get_pixel(cx, cy, 0)?, expected);
        }
        Ok(())
    }

    #[test]
    fn marker_must_fit_in_the_image() {
        let family = TagFamily::tag16_h5();
        let mut img = GrayImage::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            255u8,
        );
        assert!(draw_marker(&mut img, &family, 0, 4, (0, 0)).is_err());
    }
}
