use glam::{DMat3, DVec3};

use crate::types::PnPError;

/// Convert a row-major 3x3 array to a [`DMat3`].
pub(crate) fn dmat3_from_rows(h: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(h[0][0], h[1][0], h[2][0]),
        DVec3::new(h[0][1], h[1][1], h[2][1]),
        DVec3::new(h[0][2], h[1][2], h[2][2]),
    )
}

/// Convert a [`DMat3`] to a row-major 3x3 array.
pub(crate) fn rows_from_dmat3(m: &DMat3) -> [[f64; 3]; 3] {
    [
        [m.x_axis.x, m.y_axis.x, m.z_axis.x],
        [m.x_axis.y, m.y_axis.y, m.z_axis.y],
        [m.x_axis.z, m.y_axis.z, m.z_axis.z],
    ]
}

/// Apply a homography to a 2D point.
///
/// Returns `None` if the point maps to the line at infinity.
pub fn apply_homography(h: &[[f64; 3]; 3], p: [f64; 2]) -> Option<[f64; 2]> {
    let w = h[2][0] * p[0] + h[2][1] * p[1] + h[2][2];
    if w.abs() < 1e-12 {
        return None;
    }
    let x = h[0][0] * p[0] + h[0][1] * p[1] + h[0][2];
    let y = h[1][0] * p[0] + h[1][1] * p[1] + h[1][2];
    Some([x / w, y / w])
}

/// Compute the homography matrix from four 2D point correspondences.
///
/// * `src` - the source 2D points with shape (4, 2).
/// * `dst` - the destination 2D points with shape (4, 2).
/// * `homo` - the output homography matrix from src to dst with shape (3, 3).
pub fn homography_4pt(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
    homo: &mut [[f64; 3]; 3],
) -> Result<(), PnPError> {
    // construct the 8x9 DLT matrix
    let mut mat_a = faer::Mat::<f64>::zeros(8, 9);
    for i in 0..4 {
        let (s, d) = (src[i], dst[i]);
        mat_a.write(2 * i, 0, s[0]);
        mat_a.write(2 * i, 1, s[1]);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i, 6, -d[0] * s[0]);
        mat_a.write(2 * i, 7, -d[0] * s[1]);
        mat_a.write(2 * i, 8, -d[0]);

        mat_a.write(2 * i + 1, 3, s[0]);
        mat_a.write(2 * i + 1, 4, s[1]);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_a.write(2 * i + 1, 6, -d[1] * s[0]);
        mat_a.write(2 * i + 1, 7, -d[1] * s[1]);
        mat_a.write(2 * i + 1, 8, -d[1]);
    }

    // the null space of A is the right singular vector of the smallest
    // singular value
    let svd = mat_a.svd();
    let h = svd.v().col(8);

    homo[0] = [h[0], h[1], h[2]];
    homo[1] = [h[3], h[4], h[5]];
    homo[2] = [h[6], h[7], h[8]];

    normalize_inplace(homo);

    if det(homo).abs() < 1e-8 {
        return Err(PnPError::DegenerateHomography);
    }

    Ok(())
}

/// Compute a homography from `n >= 4` correspondences with the normalized
/// direct linear transform.
///
/// Points are conditioned with a Hartley similarity transform before the
/// SVD, which keeps the system well scaled for pixel-range inputs.
pub fn find_homography_dlt(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Result<[[f64; 3]; 3], PnPError> {
    if src.len() != dst.len() {
        return Err(PnPError::MismatchedArrayLengths {
            left_name: "src points",
            left_len: src.len(),
            right_name: "dst points",
            right_len: dst.len(),
        });
    }
    if src.len() < 4 {
        return Err(PnPError::InsufficientCorrespondences {
            required: 4,
            actual: src.len(),
        });
    }

    let t_src = conditioning_transform(src);
    let t_dst = conditioning_transform(dst);

    let n = src.len();
    let mut mat_a = faer::Mat::<f64>::zeros(2 * n, 9);
    for i in 0..n {
        let s = transform_point(&t_src, src[i]);
        let d = transform_point(&t_dst, dst[i]);

        mat_a.write(2 * i, 0, s[0]);
        mat_a.write(2 * i, 1, s[1]);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i, 6, -d[0] * s[0]);
        mat_a.write(2 * i, 7, -d[0] * s[1]);
        mat_a.write(2 * i, 8, -d[0]);

        mat_a.write(2 * i + 1, 3, s[0]);
        mat_a.write(2 * i + 1, 4, s[1]);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_a.write(2 * i + 1, 6, -d[1] * s[0]);
        mat_a.write(2 * i + 1, 7, -d[1] * s[1]);
        mat_a.write(2 * i + 1, 8, -d[1]);
    }

    let svd = mat_a.svd();
    let h = svd.v().col(8);

    let h_norm = [[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], h[8]]];

    // undo the conditioning: H = T_dst^{-1} * H_norm * T_src
    let t_dst_inv = dmat3_from_rows(&t_dst).inverse();
    let h_full = t_dst_inv * dmat3_from_rows(&h_norm) * dmat3_from_rows(&t_src);
    let mut homo = rows_from_dmat3(&h_full);

    normalize_inplace(&mut homo);

    if det(&homo).abs() < 1e-10 {
        return Err(PnPError::DegenerateHomography);
    }

    Ok(homo)
}

/// Hartley conditioning: translate the centroid to the origin and scale
/// the mean distance to `sqrt(2)`.
fn conditioning_transform(points: &[[f64; 2]]) -> [[f64; 3]; 3] {
    let n = points.len() as f64;
    let (mut cx, mut cy) = (0.0, 0.0);
    for p in points {
        cx += p[0];
        cy += p[1];
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in points {
        mean_dist += ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt();
    }
    mean_dist /= n;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    [[s, 0.0, -s * cx], [0.0, s, -s * cy], [0.0, 0.0, 1.0]]
}

#[inline]
fn transform_point(t: &[[f64; 3]; 3], p: [f64; 2]) -> [f64; 2] {
    [
        t[0][0] * p[0] + t[0][1] * p[1] + t[0][2],
        t[1][0] * p[0] + t[1][1] * p[1] + t[1][2],
    ]
}

/// Scale the matrix so that its largest-magnitude entry is 1.
fn normalize_inplace(h: &mut [[f64; 3]; 3]) {
    let mut max_abs = 0.0f64;
    for row in h.iter() {
        for v in row {
            max_abs = max_abs.max(v.abs());
        }
    }
    if max_abs > 1e-12 {
        // prefer the conventional h22 = 1 scaling when it is stable
        let scale = if h[2][2].abs() > 1e-6 * max_abs {
            h[2][2]
        } else {
            max_abs
        };
        for row in h.iter_mut() {
            for v in row.iter_mut() {
                *v /= scale;
            }
        }
    }
}

pub(crate) fn det(h: &[[f64; 3]; 3]) -> f64 {
    h[0][0] * (h[1][1] * h[2][2] - h[1][2] * h[2][1])
        - h[0][1] * (h[1][0] * h[2][2] - h[1][2] * h[2][0])
        + h[0][2] * (h[1][0] * h[2][1] - h[1][1] * h[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn four_point_identity() -> Result<(), PnPError> {
        let pts = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let mut homo = [[0.0; 3]; 3];
        homography_4pt(&pts, &pts, &mut homo)?;

        let expected = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(homo[i][j], expected[i][j], epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn four_point_translation() -> Result<(), PnPError> {
        let src = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let dst = src.map(|p| [p[0] + 3.0, p[1] - 2.0]);
        let mut homo = [[0.0; 3]; 3];
        homography_4pt(&src, &dst, &mut homo)?;

        for (s, d) in src.iter().zip(dst.iter()) {
            let mapped = apply_homography(&homo, *s).unwrap();
            assert_relative_eq!(mapped[0], d[0], epsilon = 1e-6);
            assert_relative_eq!(mapped[1], d[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let src = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let dst = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let mut homo = [[0.0; 3]; 3];
        assert!(homography_4pt(&src, &dst, &mut homo).is_err());
    }

    #[test]
    fn dlt_recovers_projective_warp() -> Result<(), PnPError> {
        // ground-truth homography with a mild projective component
        let h_true = [[1.2, 0.1, 30.0], [-0.05, 0.9, -12.0], [1e-4, -2e-4, 1.0]];

        let mut src = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                src.push([x as f64 * 100.0, y as f64 * 80.0]);
            }
        }
        let dst: Vec<[f64; 2]> = src
            .iter()
            .map(|&p| apply_homography(&h_true, p).unwrap())
            .collect();

        let h = find_homography_dlt(&src, &dst)?;
        for (s, d) in src.iter().zip(dst.iter()) {
            let mapped = apply_homography(&h, *s).unwrap();
            assert_relative_eq!(mapped[0], d[0], epsilon = 1e-6);
            assert_relative_eq!(mapped[1], d[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn dlt_requires_four_points() {
        let pts = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(
            find_homography_dlt(&pts, &pts),
            Err(PnPError::InsufficientCorrespondences {
                required: 4,
                actual: 3
            })
        ));
    }
}
