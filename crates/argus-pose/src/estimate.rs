use glam::{Mat4, Vec4};

use argus_pnp::PnPResult;

/// A single pose observation in the computer-vision camera convention.
///
/// The rotation and translation map object coordinates into the camera
/// frame, right-handed with `y` down and the camera looking along `+z`.
/// `valid` is false when the frame yielded no usable pose; consumers keep
/// rendering with their last good pose in that case.
#[derive(Debug, Clone, Copy)]
pub struct PoseEstimate {
    /// Rotation from object frame to camera frame, row-major.
    pub rotation: [[f32; 3]; 3],
    /// Translation from object frame to camera frame.
    pub translation: [f32; 3],
    /// Whether this estimate can be used.
    pub valid: bool,
}

impl PoseEstimate {
    /// An estimate flagged as unusable, with an identity pose.
    pub fn invalid() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
            valid: false,
        }
    }

    /// A valid estimate taken from a solver result.
    pub fn from_pnp(result: &PnPResult) -> Self {
        Self {
            rotation: result.rotation,
            translation: result.translation,
            valid: true,
        }
    }
}

impl From<&PnPResult> for PoseEstimate {
    fn from(result: &PnPResult) -> Self {
        Self::from_pnp(result)
    }
}

/// Convert a vision-convention pose into an OpenGL modelview matrix.
///
/// The vision frame has `y` down and the camera looking along `+z`; GL
/// has `y` up and the camera looking along `-z`. Rows 1 and 2 of the
/// rigid transform are negated to move between them, which is the same
/// as premultiplying by `diag(1, -1, -1, 1)`. The returned [`Mat4`] is
/// ready for a GL uniform upload (column-major storage).
pub fn view_from_pose(rotation: &[[f32; 3]; 3], translation: &[f32; 3]) -> Mat4 {
    let r = rotation;
    let t = translation;
    Mat4::from_cols(
        Vec4::new(r[0][0], -r[1][0], -r[2][0], 0.0),
        Vec4::new(r[0][1], -r[1][1], -r[2][1], 0.0),
        Vec4::new(r[0][2], -r[1][2], -r[2][2], 0.0),
        Vec4::new(t[0], -t[1], -t[2], 1.0),
    )
}
