#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera calibration: intrinsics, distortion and projection matrices.
pub mod calib {
    pub use argus_calib::*;
}

/// Image container, color conversion and drawing.
pub mod image {
    pub use argus_image::*;
}

/// Fiducial marker detection and pose.
pub mod marker {
    pub use argus_marker::*;
}

/// Markerless planar target tracking.
pub mod planar {
    pub use argus_planar::*;
}

/// Homography and planar pose solvers.
pub mod pnp {
    pub use argus_pnp::*;
}

/// Pose types, convention conversion and the tracking session.
pub mod pose {
    pub use argus_pose::*;
}
