#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Both tracking strategies in the pipeline reduce to the same planar
//! geometry: a homography between a plane at `z = 0` and undistorted,
//! normalized image coordinates, decomposed into a rotation and a
//! translation. This crate owns that machinery so the two estimators
//! share one implementation instead of duplicating it.

/// Common result and error types for the pose solvers.
pub mod types;

/// Rodrigues map between axis-angle vectors and rotation matrices.
pub mod so3;

/// Homography estimation: 4-point minimal and n-point DLT solvers.
pub mod homography;

/// RANSAC wrapper around the homography solvers.
pub mod ransac;

/// Planar pose recovery from a homography.
pub mod planar;

pub use crate::homography::{apply_homography, find_homography_dlt, homography_4pt};
pub use crate::planar::{all_positive_depths, solve_planar, solve_square, square_object_points};
pub use crate::ransac::{find_homography_ransac, HomographyRansacParams, HomographyRansacResult};
pub use crate::types::{PnPError, PnPResult};
