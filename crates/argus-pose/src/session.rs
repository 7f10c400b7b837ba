use glam::Mat4;

use argus_calib::{CalibError, CameraModel};
use argus_image::GrayImage;

use crate::estimate::{view_from_pose, PoseEstimate};

/// A source of pose observations over grayscale frames.
///
/// Implementors own whatever per-target state they need (marker
/// dictionary, reference keypoints) and may update internal caches
/// between frames, hence the `&mut self`.
pub trait PoseEstimator {
    /// Detect the target in `frame` and estimate its pose.
    ///
    /// Returns an estimate with `valid == false` when the target is not
    /// found; implementations never fail hard on an empty frame.
    fn detect_and_estimate(&mut self, frame: &GrayImage) -> PoseEstimate;
}

/// Drives a [`PoseEstimator`] frame by frame and maintains the pair of
/// matrices a renderer consumes.
///
/// The projection matrix is fixed at construction from the camera
/// calibration; the view matrix is refreshed on every frame with a valid
/// pose and otherwise retains its last good value, so the overlay holds
/// still instead of snapping back to the origin during dropouts. The
/// validity flag is per frame: a renderer checks it to decide whether to
/// draw pose-dependent content at all on this frame.
pub struct TrackingSession {
    camera: CameraModel,
    projection: Mat4,
    estimator: Box<dyn PoseEstimator>,
    view: Mat4,
    has_pose: bool,
}

impl TrackingSession {
    /// Create a session for the given camera and estimator.
    ///
    /// `near` and `far` are the clip planes baked into the projection
    /// matrix; they must satisfy `0 < near < far`.
    pub fn new(
        camera: CameraModel,
        estimator: Box<dyn PoseEstimator>,
        near: f32,
        far: f32,
    ) -> Result<Self, CalibError> {
        let projection = camera.projection_matrix(near, far)?;
        Ok(Self {
            camera,
            projection,
            estimator,
            view: Mat4::IDENTITY,
            has_pose: false,
        })
    }

    /// Process one frame, returning whether it yielded a valid pose.
    ///
    /// On an invalid estimate the previous view matrix is kept.
    pub fn process_frame(&mut self, frame: &GrayImage) -> bool {
        let estimate = self.estimator.detect_and_estimate(frame);
        if estimate.valid {
            self.view = view_from_pose(&estimate.rotation, &estimate.translation);
            if !self.has_pose {
                log::debug!("pose acquired");
            }
        } else if self.has_pose {
            log::debug!("no pose this frame, holding last view");
        }
        self.has_pose = estimate.valid;
        estimate.valid
    }

    /// The current modelview matrix (last valid pose, or identity if no
    /// pose has been seen yet).
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The projection matrix derived from the camera calibration.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Whether the most recently processed frame yielded a valid pose.
    ///
    /// False on dropout frames even though [`Self::view_matrix`] still
    /// returns the last good view.
    pub fn has_valid_pose(&self) -> bool {
        self.has_pose
    }

    /// The camera model this session was built with.
    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_calib::CameraIntrinsics;
    use argus_image::ImageSize;

    /// Plays back a scripted sequence of estimates.
    struct ScriptedEstimator {
        script: Vec<PoseEstimate>,
        cursor: usize,
    }

    impl PoseEstimator for ScriptedEstimator {
        fn detect_and_estimate(&mut self, _frame: &GrayImage) -> PoseEstimate {
            let estimate = self.script[self.cursor % self.script.len()];
            self.cursor += 1;
            estimate
        }
    }

    fn test_camera() -> CameraModel {
        CameraModel::pinhole(
            CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0),
            ImageSize {
                width: 640,
                height: 480,
            },
        )
    }

    fn valid_pose_at(z: f32) -> PoseEstimate {
        PoseEstimate {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, z],
            valid: true,
        }
    }

    fn blank_frame() -> GrayImage {
        GrayImage::from_size_val(
            ImageSize {
                width: 8,
                height: 8,
            },
            0u8,
        )
    }

    #[test]
    fn stale_view_is_retained_on_dropout() -> Result<(), CalibError> {
        let estimator = ScriptedEstimator {
            script: vec![valid_pose_at(5.0), PoseEstimate::invalid()],
            cursor: 0,
        };
        let mut session = TrackingSession::new(test_camera(), Box::new(estimator), 0.01, 1000.0)?;

        let frame = blank_frame();
        assert!(session.process_frame(&frame));
        let view_after_hit = session.view_matrix();
        assert_eq!(view_after_hit.w_axis.z, -5.0);

        assert!(!session.process_frame(&frame));
        assert_eq!(session.view_matrix(), view_after_hit);
        Ok(())
    }

    #[test]
    fn validity_tracks_the_current_frame() -> Result<(), CalibError> {
        let estimator = ScriptedEstimator {
            script: vec![
                valid_pose_at(2.0),
                PoseEstimate::invalid(),
                valid_pose_at(3.0),
            ],
            cursor: 0,
        };
        let mut session = TrackingSession::new(test_camera(), Box::new(estimator), 0.01, 1000.0)?;
        let frame = blank_frame();

        session.process_frame(&frame);
        assert!(session.has_valid_pose());

        // dropout frame must report no valid pose, even with a held view
        session.process_frame(&frame);
        assert!(!session.has_valid_pose());

        session.process_frame(&frame);
        assert!(session.has_valid_pose());
        Ok(())
    }

    #[test]
    fn view_is_identity_before_first_pose() -> Result<(), CalibError> {
        let estimator = ScriptedEstimator {
            script: vec![PoseEstimate::invalid()],
            cursor: 0,
        };
        let mut session = TrackingSession::new(test_camera(), Box::new(estimator), 0.01, 1000.0)?;

        assert!(!session.has_valid_pose());
        assert!(!session.process_frame(&blank_frame()));
        assert_eq!(session.view_matrix(), Mat4::IDENTITY);
        assert!(!session.has_valid_pose());
        Ok(())
    }

    #[test]
    fn projection_is_fixed_at_construction() -> Result<(), CalibError> {
        let estimator = ScriptedEstimator {
            script: vec![valid_pose_at(2.0)],
            cursor: 0,
        };
        let mut session = TrackingSession::new(test_camera(), Box::new(estimator), 0.01, 1000.0)?;

        let proj = session.projection_matrix();
        session.process_frame(&blank_frame());
        assert_eq!(session.projection_matrix(), proj);
        // fx = 800 on a 640-wide frame
        assert_eq!(proj.x_axis.x, 2.5);
        Ok(())
    }

    #[test]
    fn invalid_clip_planes_are_rejected() {
        let estimator = ScriptedEstimator {
            script: vec![PoseEstimate::invalid()],
            cursor: 0,
        };
        assert!(TrackingSession::new(test_camera(), Box::new(estimator), 10.0, 1.0).is_err());
    }
}
