use argus_calib::CameraModel;
use argus_image::GrayImage;
use argus_pnp::{
    all_positive_depths, apply_homography, find_homography_ransac, solve_planar,
    HomographyRansacParams,
};
use argus_pose::{PoseEstimate, PoseEstimator};

use crate::brief::DescriptorPattern;
use crate::fast::detect_corners;
use crate::matching::{match_descriptors, ratio_filter};
use crate::target::ReferenceTarget;

/// Tunables of the markerless tracker.
#[derive(Debug, Clone)]
pub struct PlanarTrackerConfig {
    /// FAST threshold for per-frame corner detection.
    pub fast_threshold: u8,
    /// FAST arc length for per-frame corner detection.
    pub arc_length: u8,
    /// Lowe ratio for the nearest-neighbor ambiguity test.
    pub ratio: f32,
    /// Minimum surviving matches before a pose is attempted.
    pub min_good_matches: usize,
    /// RANSAC parameters for the frame homography.
    pub ransac: HomographyRansacParams,
    /// Minimum area of the projected target outline, in square pixels.
    pub min_outline_area: f32,
}

impl Default for PlanarTrackerConfig {
    fn default() -> Self {
        Self {
            fast_threshold: 20,
            arc_length: 9,
            ratio: 0.75,
            min_good_matches: 20,
            ransac: HomographyRansacParams::default(),
            min_outline_area: 100.0,
        }
    }
}

/// Estimates the camera pose relative to a registered planar target.
///
/// Per frame: detect and describe corners, match them against the
/// reference, prune ambiguous matches with the ratio test, fit a
/// homography with RANSAC, project the target outline into the frame and
/// recover the pose from the outline. Any stage may bail out with an
/// invalid estimate; the tracker never fails hard on a bad frame.
pub struct PlanarPoseEstimator {
    target: ReferenceTarget,
    camera: CameraModel,
    pattern: DescriptorPattern,
    config: PlanarTrackerConfig,
}

impl PlanarPoseEstimator {
    /// Create an estimator with default tunables.
    pub fn new(target: ReferenceTarget, camera: CameraModel, pattern: DescriptorPattern) -> Self {
        Self::with_config(target, camera, pattern, PlanarTrackerConfig::default())
    }

    /// Create an estimator with explicit tunables.
    pub fn with_config(
        target: ReferenceTarget,
        camera: CameraModel,
        pattern: DescriptorPattern,
        config: PlanarTrackerConfig,
    ) -> Self {
        Self {
            target,
            camera,
            pattern,
            config,
        }
    }

    /// The registered target.
    pub fn target(&self) -> &ReferenceTarget {
        &self.target
    }

    fn estimate(&self, frame: &GrayImage) -> Option<PoseEstimate> {
        let corners = detect_corners(frame, self.config.fast_threshold, self.config.arc_length);
        if corners.is_empty() {
            log::debug!("no corners in frame");
            return None;
        }

        let (keypoints, descriptors) = self.pattern.describe(frame, &corners);
        if descriptors.is_empty() {
            return None;
        }

        let matches = match_descriptors(&descriptors, self.target.descriptors());
        let good = ratio_filter(&matches, self.config.ratio);
        if good.len() < self.config.min_good_matches {
            log::debug!(
                "{} good matches, need {}",
                good.len(),
                self.config.min_good_matches
            );
            return None;
        }

        let src: Vec<[f64; 2]> = good
            .iter()
            .map(|m| {
                let kp = self.target.keypoints()[m.train_idx];
                [kp.x as f64, kp.y as f64]
            })
            .collect();
        let dst: Vec<[f64; 2]> = good
            .iter()
            .map(|m| {
                let kp = keypoints[m.query_idx];
                [kp.x as f64, kp.y as f64]
            })
            .collect();

        let ransac = match find_homography_ransac(&src, &dst, &self.config.ransac) {
            Ok(result) => result,
            Err(err) => {
                log::debug!("homography estimation failed: {err}");
                return None;
            }
        };

        // project the target outline into the frame
        let mut outline = [[0.0f32; 2]; 4];
        for (out, corner) in outline
            .iter_mut()
            .zip(self.target.corner_pixel_points().iter())
        {
            let mapped =
                apply_homography(&ransac.homography, [corner[0] as f64, corner[1] as f64])?;
            *out = [mapped[0] as f32, mapped[1] as f32];
        }

        if !outline_is_sane(&outline, self.config.min_outline_area) {
            log::debug!("projected outline is degenerate, dropping frame");
            return None;
        }

        let normalized = self.camera.undistort_normalized_points(&outline);
        let object = self.target.corner_object_points();

        let result = match solve_planar(&object, &normalized) {
            Ok(result) => result,
            Err(err) => {
                log::debug!("planar pose solve failed: {err}");
                return None;
            }
        };

        if !all_positive_depths(&result.rotation, &result.translation, &object) {
            log::debug!("pose places the target behind the camera");
            return None;
        }

        Some(PoseEstimate::from_pnp(&result))
    }
}

impl PoseEstimator for PlanarPoseEstimator {
    fn detect_and_estimate(&mut self, frame: &GrayImage) -> PoseEstimate {
        self.estimate(frame).unwrap_or_else(PoseEstimate::invalid)
    }
}

/// Whether the projected outline is convex in screen order and covers a
/// plausible area.
fn outline_is_sane(outline: &[[f32; 2]; 4], min_area: f32) -> bool {
    let mut doubled_area = 0.0f32;
    for i in 0..4 {
        let a = outline[i];
        let b = outline[(i + 1) % 4];
        let c = outline[(i + 2) % 4];
        let cross = (b[0] - a[0]) * (c[1] - b[1]) - (b[1] - a[1]) * (c[0] - b[0]);
        if cross <= 0.0 {
            return false;
        }
        doubled_area += a[0] * b[1] - b[0] * a[1];
    }
    doubled_area / 2.0 >= min_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_calib::CameraIntrinsics;
    use argus_image::ImageSize;

    /// Aperiodic dark/light 4x4 blocks from an LCG stream; rich in
    /// corners and free of repeating structure that would confuse the
    /// ratio test.
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

    fn test_camera(side: usize) -> CameraModel {
        CameraModel::pinhole(
            CameraIntrinsics::new(300.0, 300.0, side as f32 / 2.0, side as f32 / 2.0),
            ImageSize {
                width: side,
                height: side,
            },
        )
    }

    fn seeded_config() -> PlanarTrackerConfig {
        PlanarTrackerConfig {
            ransac: HomographyRansacParams {
                random_seed: Some(42),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn reference_frame_tracks_itself() {
        let side = 160;
        let reference = speckle_image(side);
        let pattern = DescriptorPattern::new();
        let target = ReferenceTarget::with_options(&reference, &pattern, side as f32, 20, 9)
            .expect("textured reference");

        let mut estimator = PlanarPoseEstimator::with_config(
            target,
            test_camera(side),
            DescriptorPattern::new(),
            seeded_config(),
        );

        let estimate = estimator.detect_and_estimate(&reference);
        assert!(estimate.valid);
        assert!(estimate.translation[2] > 0.0);
    }

    #[test]
    fn blank_frame_gives_no_pose() {
        let side = 160;
        let pattern = DescriptorPattern::new();
        let target =
            ReferenceTarget::with_options(&speckle_image(side), &pattern, side as f32, 20, 9)
                .expect("textured reference");
        let mut estimator = PlanarPoseEstimator::with_config(
            target,
            test_camera(side),
            DescriptorPattern::new(),
            seeded_config(),
        );

        let blank = GrayImage::from_size_val([side, side].into(), 255u8);
        assert!(!estimator.detect_and_estimate(&blank).valid);
    }

    #[test]
    fn match_floor_is_enforced() {
        let side = 160;
        let reference = speckle_image(side);
        let pattern = DescriptorPattern::new();
        let target = ReferenceTarget::with_options(&reference, &pattern, side as f32, 20, 9)
            .expect("textured reference");

        let config = PlanarTrackerConfig {
            min_good_matches: usize::MAX,
            ..seeded_config()
        };
        let mut estimator = PlanarPoseEstimator::with_config(
            target,
            test_camera(side),
            DescriptorPattern::new(),
            config,
        );

        // the frame matches perfectly, but the floor can never be met
        assert!(!estimator.detect_and_estimate(&reference).valid);
    }

    #[test]
    fn match_floor_boundary_is_exact() {
        let side = 160;
        let reference = speckle_image(side);
        let pattern = DescriptorPattern::new();
        let register = || {
            ReferenceTarget::with_options(&reference, &pattern, side as f32, 20, 9)
                .expect("textured reference")
        };

        // count the good matches of the self-tracked frame by replaying
        // the front of the pipeline
        let target = register();
        let corners = detect_corners(&reference, 20, 9);
        let (_, descriptors) = pattern.describe(&reference, &corners);
        let matches = match_descriptors(&descriptors, target.descriptors());
        let good = ratio_filter(&matches, 0.75).len();
        assert!(good >= PlanarTrackerConfig::default().min_good_matches);

        // floor exactly at the available count: the pose attempt proceeds
        let mut at_floor = PlanarPoseEstimator::with_config(
            target,
            test_camera(side),
            DescriptorPattern::new(),
            PlanarTrackerConfig {
                min_good_matches: good,
                ..seeded_config()
            },
        );
        assert!(at_floor.detect_and_estimate(&reference).valid);

        // one above leaves the frame one match short
        let mut above_floor = PlanarPoseEstimator::with_config(
            register(),
            test_camera(side),
            DescriptorPattern::new(),
            PlanarTrackerConfig {
                min_good_matches: good + 1,
                ..seeded_config()
            },
        );
        assert!(!above_floor.detect_and_estimate(&reference).valid);
    }

    #[test]
    fn outline_sanity_rejects_concave_and_tiny_shapes() {
        let convex = [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];
        assert!(outline_is_sane(&convex, 100.0));

        let tiny = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]];
        assert!(!outline_is_sane(&tiny, 100.0));

        let bowtie = [[0.0, 0.0], [100.0, 0.0], [0.0, 100.0], [100.0, 100.0]];
        assert!(!outline_is_sane(&bowtie, 100.0));
    }
}
