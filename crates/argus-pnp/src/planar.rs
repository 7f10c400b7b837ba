use glam::{Mat3, Vec3};

use crate::homography::{find_homography_dlt, homography_4pt};
use crate::so3;
use crate::types::{PnPError, PnPResult};

/// Maximum |z| for an object point to count as lying on the `z = 0` plane.
const PLANARITY_EPS: f32 = 1e-5;

/// Estimate the pose of a square planar object from its four image corners.
///
/// The four object points are implicitly a square of side `square_length`
/// on the plane `z = 0`, in the order:
///  - p0 = `[-L/2,  L/2, 0]`
///  - p1 = `[ L/2,  L/2, 0]`
///  - p2 = `[ L/2, -L/2, 0]`
///  - p3 = `[-L/2, -L/2, 0]`
///
/// `image_points_norm` are the corresponding undistorted, normalized image
/// coordinates (pixel coordinates premultiplied by `K^{-1}`).
pub fn solve_square(
    image_points_norm: &[[f32; 2]; 4],
    square_length: f32,
) -> Result<PnPResult, PnPError> {
    let h = (square_length as f64) / 2.0;
    let src: [[f64; 2]; 4] = [[-h, h], [h, h], [h, -h], [-h, -h]];
    let dst: [[f64; 2]; 4] = image_points_norm.map(|p| [p[0] as f64, p[1] as f64]);

    let mut hmat = [[0.0f64; 3]; 3];
    homography_4pt(&src, &dst, &mut hmat)?;

    let (rotation, translation) = decompose_homography_normalized(&hmat)?;

    let object = square_object_points(square_length);
    finish_pose(rotation, translation, &object, image_points_norm)
}

/// Estimate the pose of an arbitrary planar object from `n >= 4`
/// correspondences.
///
/// All object points must lie on `z = 0`; `image_points_norm` are
/// undistorted, normalized image coordinates. This is the general planar
/// path used by the markerless estimator, as opposed to the square
/// specialization above.
pub fn solve_planar(
    object: &[[f32; 3]],
    image_points_norm: &[[f32; 2]],
) -> Result<PnPResult, PnPError> {
    if object.len() != image_points_norm.len() {
        return Err(PnPError::MismatchedArrayLengths {
            left_name: "object points",
            left_len: object.len(),
            right_name: "image points",
            right_len: image_points_norm.len(),
        });
    }
    if object.len() < 4 {
        return Err(PnPError::InsufficientCorrespondences {
            required: 4,
            actual: object.len(),
        });
    }
    if object.iter().any(|p| p[2].abs() > PLANARITY_EPS) {
        return Err(PnPError::NonPlanarObject);
    }

    let src: Vec<[f64; 2]> = object.iter().map(|p| [p[0] as f64, p[1] as f64]).collect();
    let dst: Vec<[f64; 2]> = image_points_norm
        .iter()
        .map(|p| [p[0] as f64, p[1] as f64])
        .collect();

    let hmat = find_homography_dlt(&src, &dst)?;
    let (rotation, translation) = decompose_homography_normalized(&hmat)?;

    finish_pose(rotation, translation, object, image_points_norm)
}

/// Whether every object point lands in front of the camera under `(r, t)`.
pub fn all_positive_depths(r: &[[f32; 3]; 3], t: &[f32; 3], object: &[[f32; 3]]) -> bool {
    let r_mat = so3::mat3_from_rows(r);
    let t_vec = Vec3::from_array(*t);
    object.iter().all(|p| {
        let pc = r_mat * Vec3::from_array(*p) + t_vec;
        pc.z > 0.0
    })
}

/// Decompose a homography between the `z = 0` object plane and normalized
/// image coordinates into a rotation and a translation.
///
/// For normalized coordinates `H ~ [r1 r2 t]` up to scale; the scale is
/// fixed so the first two columns have unit norm, with the sign chosen to
/// place the plane in front of the camera.
fn decompose_homography_normalized(
    h: &[[f64; 3]; 3],
) -> Result<([[f32; 3]; 3], [f32; 3]), PnPError> {
    let h1 = [h[0][0], h[1][0], h[2][0]];
    let h2 = [h[0][1], h[1][1], h[2][1]];
    let h3 = [h[0][2], h[1][2], h[2][2]];

    let n1 = (h1[0] * h1[0] + h1[1] * h1[1] + h1[2] * h1[2]).sqrt();
    let n2 = (h2[0] * h2[0] + h2[1] * h2[1] + h2[2] * h2[2]).sqrt();
    if n1 < 1e-12 || n2 < 1e-12 {
        return Err(PnPError::DegenerateHomography);
    }
    let mut s = 1.0 / (n1 * n2).sqrt();

    // cheirality: the plane origin must sit in front of the camera
    if h3[2] * s < 0.0 {
        s = -s;
    }
    if (h3[2] * s).abs() < 1e-9 {
        return Err(PnPError::DegenerateHomography);
    }

    let r1 = Vec3::new((h1[0] * s) as f32, (h1[1] * s) as f32, (h1[2] * s) as f32);
    let r2 = Vec3::new((h2[0] * s) as f32, (h2[1] * s) as f32, (h2[2] * s) as f32);
    let r3 = r1.cross(r2);

    let rotation = so3::orthonormalize(&Mat3::from_cols(r1, r2, r3));
    let translation = [(h3[0] * s) as f32, (h3[1] * s) as f32, (h3[2] * s) as f32];

    Ok((so3::rows_from_mat3(&rotation), translation))
}

/// Generate the 3D object points of a square in the canonical order on the
/// `z = 0` plane.
pub fn square_object_points(square_length: f32) -> [[f32; 3]; 4] {
    let h = square_length / 2.0;
    [[-h, h, 0.0], [h, h, 0.0], [h, -h, 0.0], [-h, -h, 0.0]]
}

fn finish_pose(
    rotation: [[f32; 3]; 3],
    translation: [f32; 3],
    object: &[[f32; 3]],
    image_points_norm: &[[f32; 2]],
) -> Result<PnPResult, PnPError> {
    let rmse = rmse_normalized(object, image_points_norm, &rotation, &translation)?;
    let rvec = so3::log(&so3::mat3_from_rows(&rotation));
    Ok(PnPResult {
        rotation,
        translation,
        rvec: [rvec.x, rvec.y, rvec.z],
        reproj_rmse: Some(rmse),
    })
}

/// Root-mean-square reprojection error in normalized image units (`K = I`).
fn rmse_normalized(
    points_world: &[[f32; 3]],
    points_norm: &[[f32; 2]],
    r: &[[f32; 3]; 3],
    t: &[f32; 3],
) -> Result<f32, PnPError> {
    let r_mat = so3::mat3_from_rows(r);
    let t_vec = Vec3::from_array(*t);

    let mut sum_sq = 0.0f32;
    for (pw, uv) in points_world.iter().zip(points_norm.iter()) {
        let pc = r_mat * Vec3::from_array(*pw) + t_vec;
        if pc.z.abs() < 1e-6 {
            return Err(PnPError::NearZeroDepth);
        }
        let inv_z = 1.0 / pc.z;
        let du = pc.x * inv_z - uv[0];
        let dv = pc.y * inv_z - uv[1];
        sum_sq += du.mul_add(du, dv * dv);
    }
    Ok((sum_sq / points_world.len() as f32).sqrt())
}
