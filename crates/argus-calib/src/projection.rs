use argus_image::ImageSize;
use glam::{Mat4, Vec4};

use crate::intrinsics::CameraIntrinsics;

/// Build an off-center OpenGL frustum projection from camera intrinsics.
///
/// The frustum reproduces the calibrated camera's field of view so that
/// rendered geometry lines up with the camera background. The principal
/// point offset lands in the third column, which carries the NDC skew in
/// the column-major layout the rendering layer consumes.
pub fn projection_from_intrinsics(
    intrinsics: &CameraIntrinsics,
    frame_size: ImageSize,
    near: f32,
    far: f32,
) -> Mat4 {
    let w = frame_size.width as f32;
    let h = frame_size.height as f32;

    Mat4::from_cols(
        Vec4::new(2.0 * intrinsics.fx / w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * intrinsics.fy / h, 0.0, 0.0),
        Vec4::new(
            1.0 - 2.0 * intrinsics.cx / w,
            2.0 * intrinsics.cy / h - 1.0,
            -(far + near) / (far - near),
            -1.0,
        ),
        Vec4::new(0.0, 0.0, -2.0 * far * near / (far - near), 0.0),
    )
}
