#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The detection pipeline binarizes the frame with a tiled adaptive
//! threshold, groups dark pixels into connected components, fits a quad
//! to each candidate component and decodes the payload bits against a
//! tag family dictionary. Decoded markers feed the square planar pose
//! solver to produce a camera pose.

/// Error types for the marker pipeline.
pub mod errors;

/// Tag family dictionaries and payload decoding.
pub mod family;

/// Marker rendering, for generating printable tags and test fixtures.
pub mod render;

/// Tiled adaptive binarization.
pub mod threshold;

/// Disjoint-set structure used by the segmenter.
pub mod union_find;

/// Connected-component clustering of dark pixels.
pub mod segmentation;

/// Quad fitting over pixel clusters.
pub mod quad;

/// Payload bit sampling and dictionary lookup.
pub mod decode;

/// The full-frame detector and the fiducial pose estimator.
pub mod detector;

pub use crate::decode::MarkerDetection;
pub use crate::detector::{DetectionStats, MarkerDetector, MarkerDetectorConfig, MarkerPoseEstimator};
pub use crate::errors::MarkerError;
pub use crate::family::TagFamily;
pub use crate::quad::Quad;
