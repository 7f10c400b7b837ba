#![deny(missing_docs)]
//! Pose representation and tracking for augmented-reality overlays.
//!
//! This crate ties the planar pose solvers to a rendering loop: a
//! [`PoseEstimate`] in the computer-vision camera convention is converted
//! into an OpenGL modelview matrix by [`view_from_pose`], and a
//! [`TrackingSession`] drives any [`PoseEstimator`] frame by frame while
//! holding the projection matrix derived from the camera calibration.

/// Pose observations and vision-to-GL conversion.
pub mod estimate;

/// The estimator trait and the frame-by-frame tracking session.
pub mod session;

pub use crate::estimate::{view_from_pose, PoseEstimate};
pub use crate::session::{PoseEstimator, TrackingSession};
