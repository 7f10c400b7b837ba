use argus_image::GrayImage;
use argus_pnp::homography_4pt;

use crate::family::TagFamily;
use crate::quad::Quad;

/// Minimum gray-level separation between the border and the brightest
/// payload cell for a decode attempt.
const MIN_DECODE_CONTRAST: f32 = 40.0;

/// A decoded marker observation.
#[derive(Debug, Clone, Copy)]
pub struct MarkerDetection {
    /// Marker id within the family dictionary.
    pub id: usize,
    /// Number of corrected payload bit errors.
    pub hamming: u32,
    /// Pixel corners of the border square, reordered so that index 0 is
    /// the canonical top-left corner of the decoded tag.
    pub corners: [[f32; 2]; 4],
}

/// Sample and decode the payload of a candidate quad.
///
/// A homography maps the border-square cell frame onto the quad, payload
/// cells are sampled at their centers in the grayscale frame and
/// thresholded midway between the border level and the brightest sample,
/// then the bits are matched against the family dictionary.
pub fn decode_quad(
    gray: &GrayImage,
    quad: &Quad,
    family: &TagFamily,
    max_hamming: u32,
) -> Option<MarkerDetection> {
    let wab = family.width_at_border as f64;
    let cell_frame = [[0.0, 0.0], [wab, 0.0], [wab, wab], [0.0, wab]];
    let corners_f64 = quad.corners.map(|c| [c[0] as f64, c[1] as f64]);

    let mut homo = [[0.0f64; 3]; 3];
    homography_4pt(&cell_frame, &corners_f64, &mut homo).ok()?;

    // border level from the four corner cells of the black ring
    let mut border_sum = 0.0f32;
    for &(bx, by) in &[
        (0.5, 0.5),
        (wab - 0.5, 0.5),
        (wab - 0.5, wab - 0.5),
        (0.5, wab - 0.5),
    ] {
        border_sum += sample_cell(gray, &homo, bx, by)?;
    }
    let border_level = border_sum / 4.0;

    let mut samples = [0.0f32; 64];
    let mut brightest = f32::MIN;
    for i in 0..family.nbits {
        let s = sample_cell(
            gray,
            &homo,
            family.bit_x[i] as f64 + 0.5,
            family.bit_y[i] as f64 + 0.5,
        )?;
        samples[i] = s;
        brightest = brightest.max(s);
    }

    if brightest - border_level < MIN_DECODE_CONTRAST {
        return None;
    }
    let thresh = (border_level + brightest) / 2.0;

    // a real tag has a white quiet zone all around its border
    for &(qx, qy) in &[
        (-0.5, -0.5),
        (wab / 2.0, -0.5),
        (wab + 0.5, -0.5),
        (wab + 0.5, wab / 2.0),
        (wab + 0.5, wab + 0.5),
        (wab / 2.0, wab + 0.5),
        (-0.5, wab + 0.5),
        (-0.5, wab / 2.0),
    ] {
        if sample_cell(gray, &homo, qx, qy)? <= thresh {
            return None;
        }
    }

    let mut bits = 0u64;
    for i in 0..family.nbits {
        if samples[i] > thresh {
            bits |= 1 << (family.nbits - 1 - i);
        }
    }

    let matched = family.decode(bits, max_hamming)?;

    let mut corners = quad.corners;
    corners.rotate_left(matched.rotation as usize);

    Some(MarkerDetection {
        id: matched.id,
        hamming: matched.hamming,
        corners,
    })
}

/// Sample the gray value at a cell-frame coordinate through the
/// homography. Returns `None` when the mapped point leaves the frame.
fn sample_cell(gray: &GrayImage, homo: &[[f64; 3]; 3], cx: f64, cy: f64) -> Option<f32> {
    let mapped = argus_pnp::apply_homography(homo, [cx, cy])?;
    if mapped[0] < 0.0 || mapped[1] < 0.0 {
        return None;
    }
    let x = mapped[0] as usize;
    let y = mapped[1] as usize;
    gray.get_pixel(x, y, 0).ok().map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::marker_image;

    fn border_quad(family: &TagFamily, scale: usize, padding: usize) -> Quad {
        let margin = (family.total_width - family.width_at_border) / 2;
        let x0 = (padding + margin * scale) as f32;
        let side = (family.width_at_border * scale) as f32;
        Quad {
            corners: [
                [x0, x0],
                [x0 + side, x0],
                [x0 + side, x0 + side],
                [x0, x0 + side],
            ],
        }
    }

    #[test]
    fn rendered_markers_decode_to_their_id() {
        let family = TagFamily::tag16_h5();
        for id in [0, 5, 17, 29] {
            let img = marker_image(&family, id, 8, 16).unwrap();
            let quad = border_quad(&family, 8, 16);

            let detection = decode_quad(&img, &quad, &family, 1).unwrap();
            assert_eq!(detection.id, id);
            assert_eq!(detection.hamming, 0);
        }
    }

    #[test]
    fn flat_region_fails_contrast_gate() {
        let family = TagFamily::tag16_h5();
        let img = GrayImage::from_size_val(
            argus_image::ImageSize {
                width: 128,
                height: 128,
            },
            180u8,
        );
        let quad = Quad {
            corners: [
                [20.0, 20.0],
                [80.0, 20.0],
                [80.0, 80.0],
                [20.0, 80.0],
            ],
        };
        assert!(decode_quad(&img, &quad, &family, 1).is_none());
    }

    #[test]
    fn quad_outside_frame_is_rejected() {
        let family = TagFamily::tag16_h5();
        let img = marker_image(&family, 0, 8, 0).unwrap();
        let quad = Quad {
            corners: [
                [-40.0, -40.0],
                [20.0, -40.0],
                [20.0, 20.0],
                [-40.0, 20.0],
            ],
        };
        assert!(decode_quad(&img, &quad, &family, 1).is_none());
    }
}
