use thiserror::Error;

/// Error types for the pose solvers.
#[derive(Debug, Error)]
pub enum PnPError {
    /// Not enough 2D-3D correspondences for the requested solver.
    #[error("solver requires at least {required} correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum number of correspondences required by the solver.
        required: usize,
        /// Actual number of correspondences provided.
        actual: usize,
    },

    /// Input slices that must be parallel have different lengths.
    #[error("mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedArrayLengths {
        /// Label for the left-hand slice.
        left_name: &'static str,
        /// Length of the left-hand slice.
        left_len: usize,
        /// Label for the right-hand slice.
        right_name: &'static str,
        /// Length of the right-hand slice.
        right_len: usize,
    },

    /// The homography is numerically degenerate (near-zero determinant or
    /// a plane passing through the camera center).
    #[error("degenerate homography")]
    DegenerateHomography,

    /// The object points handed to the planar solver do not lie on `z = 0`.
    #[error("object points are not coplanar on z = 0")]
    NonPlanarObject,

    /// A projected point has near-zero depth along the camera axis.
    #[error("projection has near-zero depth along z axis")]
    NearZeroDepth,

    /// RANSAC did not find a consensus set of the required size.
    #[error("RANSAC found {actual} inliers, requires at least {required}")]
    InsufficientInliers {
        /// Minimum number of inliers required.
        required: usize,
        /// Number of inliers found.
        actual: usize,
    },
}

/// Pose recovered by a planar solver.
///
/// The rotation maps coordinates from the object frame to the camera
/// frame, in the vision convention (right-handed, y down, camera looks
/// along `+z`).
#[derive(Debug, Clone)]
pub struct PnPResult {
    /// Estimated rotation matrix, row-major.
    pub rotation: [[f32; 3]; 3],
    /// Estimated translation vector.
    pub translation: [f32; 3],
    /// Rodrigues axis-angle representation of the rotation.
    pub rvec: [f32; 3],
    /// Root-mean-square reprojection error in normalized image units.
    pub reproj_rmse: Option<f32>,
}
