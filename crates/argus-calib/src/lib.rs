#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The calibration model is loaded exactly once at startup from a JSON file
//! containing the 3x3 camera matrix and the distortion coefficients. There
//! are deliberately no fallback intrinsics: a missing or malformed file is
//! a fatal configuration error, not something to paper over with defaults.

/// Calibration error types.
pub mod error;

/// Pinhole intrinsic parameters.
pub mod intrinsics;

/// Brown-Conrady polynomial distortion.
pub mod distortion;

/// The loaded camera model.
pub mod model;

/// OpenGL-style projection matrix from intrinsics.
pub mod projection;

pub use crate::distortion::PolynomialDistortion;
pub use crate::error::CalibError;
pub use crate::intrinsics::CameraIntrinsics;
pub use crate::model::CameraModel;
pub use crate::projection::projection_from_intrinsics;
