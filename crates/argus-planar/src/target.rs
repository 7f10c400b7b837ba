use argus_image::{GrayImage, ImageSize};

use crate::brief::{Descriptor, DescriptorPattern};
use crate::error::PlanarError;
use crate::fast::{detect_corners, Corner};

/// A textured planar target registered for tracking.
///
/// Registration runs feature detection and description once; the result
/// is immutable and shared by every subsequent frame. Pixel coordinates
/// of the reference image are mapped onto a plane at `z = 0` through the
/// plane scale `s`: pixel `(x, y)` becomes `(x / s - 0.5, 0.5 - y / s, 0)`,
/// so the image `x` axis keeps its direction while `y` flips from
/// screen-down to plane-up.
pub struct ReferenceTarget {
    keypoints: Vec<Corner>,
    descriptors: Vec<Descriptor>,
    image_size: ImageSize,
    plane_scale: f32,
}

impl ReferenceTarget {
    /// Default plane scale: pixels per plane unit.
    pub const DEFAULT_PLANE_SCALE: f32 = 640.0;

    /// Default FAST threshold used at registration.
    pub const DEFAULT_FAST_THRESHOLD: u8 = 20;

    /// Default FAST arc length used at registration.
    pub const DEFAULT_ARC_LENGTH: u8 = 9;

    /// Register a target with default parameters.
    pub fn from_image(img: &GrayImage, pattern: &DescriptorPattern) -> Result<Self, PlanarError> {
        Self::with_options(
            img,
            pattern,
            Self::DEFAULT_PLANE_SCALE,
            Self::DEFAULT_FAST_THRESHOLD,
            Self::DEFAULT_ARC_LENGTH,
        )
    }

    /// Register a target with explicit parameters.
    ///
    /// Fails with [`PlanarError::FeaturelessReference`] when the image
    /// yields no describable features; tracking against such a target
    /// could never produce a pose.
    pub fn with_options(
        img: &GrayImage,
        pattern: &DescriptorPattern,
        plane_scale: f32,
        fast_threshold: u8,
        arc_length: u8,
    ) -> Result<Self, PlanarError> {
        if !(plane_scale > 0.0) {
            return Err(PlanarError::InvalidPlaneScale(plane_scale));
        }

        let corners = detect_corners(img, fast_threshold, arc_length);
        let (keypoints, descriptors) = pattern.describe(img, &corners);
        if descriptors.is_empty() {
            return Err(PlanarError::FeaturelessReference);
        }

        log::info!(
            "registered planar target: {} features over {}x{}",
            keypoints.len(),
            img.cols(),
            img.rows()
        );

        Ok(Self {
            keypoints,
            descriptors,
            image_size: img.size(),
            plane_scale,
        })
    }

    /// Registered keypoints, in reference image pixels.
    pub fn keypoints(&self) -> &[Corner] {
        &self.keypoints
    }

    /// Descriptors parallel to [`Self::keypoints`].
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// The size of the reference image.
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Map a reference pixel onto the target plane.
    pub fn plane_point(&self, pixel: [f32; 2]) -> [f32; 3] {
        [
            pixel[0] / self.plane_scale - 0.5,
            0.5 - pixel[1] / self.plane_scale,
            0.0,
        ]
    }

    /// The reference image corners in pixels: top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn corner_pixel_points(&self) -> [[f32; 2]; 4] {
        let w = self.image_size.width as f32;
        let h = self.image_size.height as f32;
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
    }

    /// The reference image corners on the target plane.
    pub fn corner_object_points(&self) -> [[f32; 3]; 4] {
        self.corner_pixel_points().map(|p| self.plane_point(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Aperiodic dark/light 4x4 blocks from an LCG stream.
    fn speckle_image(side: usize) -> GrayImage {
        let mut img = GrayImage::from_size_val([side, side].into(), 220u8);
        let blocks = side.div_ceil(4);
        let mut dark = vec![false; blocks * blocks];
        let mut v = 7u32;
        for cell in dark.iter_mut() {
            v = v.wrapping_mul(1664525).wrapping_add(1013904223);
            *cell = v % 3 == 0;
        }
        for y in 0..side {
            for x in 0..side {
                if dark[(y / 4) * blocks + x / 4] {
                    img.set_pixel(x, y, 0, 30).unwrap();
                }
            }
        }
        img
    }

    #[test]
    fn textured_image_registers() -> Result<(), PlanarError> {
        let pattern = DescriptorPattern::new();
        let target = ReferenceTarget::from_image(&speckle_image(128), &pattern)?;
        assert!(!target.keypoints().is_empty());
        assert_eq!(target.keypoints().len(), target.descriptors().len());
        Ok(())
    }

    #[test]
    fn featureless_image_is_refused() {
        let pattern = DescriptorPattern::new();
        let img = GrayImage::from_size_val([128, 128].into(), 128u8);
        assert!(matches!(
            ReferenceTarget::from_image(&img, &pattern),
            Err(PlanarError::FeaturelessReference)
        ));
    }

    #[test]
    fn plane_mapping_is_centered_and_flipped() -> Result<(), PlanarError> {
        let pattern = DescriptorPattern::new();
        let target = ReferenceTarget::with_options(
            &speckle_image(128),
            &pattern,
            128.0,
            20,
            9,
        )?;

        let center = target.plane_point([64.0, 64.0]);
        assert_relative_eq!(center[0], 0.0);
        assert_relative_eq!(center[1], 0.0);

        // top-left pixel maps to the upper-left plane corner
        let tl = target.plane_point([0.0, 0.0]);
        assert_relative_eq!(tl[0], -0.5);
        assert_relative_eq!(tl[1], 0.5);
        assert_relative_eq!(tl[2], 0.0);
        Ok(())
    }

    #[test]
    fn invalid_plane_scale_is_rejected() {
        let pattern = DescriptorPattern::new();
        let img = speckle_image(64);
        assert!(matches!(
            ReferenceTarget::with_options(&img, &pattern, 0.0, 20, 9),
            Err(PlanarError::InvalidPlaneScale(_))
        ));
    }
}
