use glam::{Mat3, Quat, Vec3};

/// Rodrigues exponential map: axis-angle vector to rotation matrix.
pub fn exp(rvec: Vec3) -> Mat3 {
    let theta = rvec.length();
    if theta < f32::EPSILON {
        return Mat3::IDENTITY;
    }
    Mat3::from_quat(Quat::from_axis_angle(rvec / theta, theta))
}

/// Rodrigues logarithm map: rotation matrix to axis-angle vector.
pub fn log(r: &Mat3) -> Vec3 {
    let mut q = Quat::from_mat3(r).normalize();
    // keep the scalar part non-negative so the angle lands in [0, pi]
    if q.w < 0.0 {
        q = -q;
    }
    let vec = Vec3::new(q.x, q.y, q.z);
    let sin_half = vec.length();
    if sin_half < f32::EPSILON {
        return Vec3::ZERO;
    }
    let theta = 2.0 * sin_half.atan2(q.w);
    vec * (theta / sin_half)
}

/// Project an approximate rotation matrix onto SO(3).
///
/// The homography decomposition yields columns that are only close to
/// orthonormal; round-tripping through a unit quaternion snaps them back.
pub fn orthonormalize(m: &Mat3) -> Mat3 {
    Mat3::from_quat(Quat::from_mat3(m).normalize())
}

/// Convert a row-major rotation array to a [`Mat3`].
#[inline]
pub fn mat3_from_rows(r: &[[f32; 3]; 3]) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(r[0][0], r[1][0], r[2][0]),
        Vec3::new(r[0][1], r[1][1], r[2][1]),
        Vec3::new(r[0][2], r[1][2], r[2][2]),
    )
}

/// Convert a [`Mat3`] to a row-major rotation array.
#[inline]
pub fn rows_from_mat3(m: &Mat3) -> [[f32; 3]; 3] {
    [
        [m.x_axis.x, m.y_axis.x, m.z_axis.x],
        [m.x_axis.y, m.y_axis.y, m.z_axis.y],
        [m.x_axis.z, m.y_axis.z, m.z_axis.z],
    ]
}
