#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! A textured planar target is registered once as a [`ReferenceTarget`];
//! afterwards each camera frame is matched against it with binary
//! descriptors over FAST corners, a RANSAC homography maps the target
//! outline into the frame, and the planar pose solver turns that outline
//! into a camera pose.

/// Error types for the planar tracking pipeline.
pub mod error;

/// FAST corner detection.
pub mod fast;

/// Binary patch descriptors.
pub mod brief;

/// Descriptor matching and the ratio test.
pub mod matching;

/// The registered reference target.
pub mod target;

/// The markerless pose estimator.
pub mod estimator;

pub use crate::brief::{Descriptor, DescriptorPattern};
pub use crate::error::PlanarError;
pub use crate::estimator::{PlanarPoseEstimator, PlanarTrackerConfig};
pub use crate::fast::{detect_corners, Corner};
pub use crate::matching::{match_descriptors, ratio_filter, DescriptorMatch};
pub use crate::target::ReferenceTarget;
