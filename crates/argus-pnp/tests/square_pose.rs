use approx::assert_relative_eq;
use argus_pnp::{solve_square, square_object_points};

#[test]
fn square_identity_pose() {
    // Square of side 1.0 centered at origin on z=0, observed so that the
    // normalized image coordinates coincide with the object plane
    // (camera one unit above the plane, looking straight down).
    let norm = [[-0.5f32, 0.5], [0.5, 0.5], [0.5, -0.5], [-0.5, -0.5]];

    let res = solve_square(&norm, 1.0).expect("solve_square should succeed");
    let r = res.rotation;
    let t = res.translation;

    assert_relative_eq!(r[0][0], 1.0, epsilon = 1e-2);
    assert_relative_eq!(r[1][1], 1.0, epsilon = 1e-2);
    assert_relative_eq!(r[2][2], 1.0, epsilon = 1e-2);
    assert_relative_eq!(t[0], 0.0, epsilon = 5e-2);
    assert_relative_eq!(t[1], 0.0, epsilon = 5e-2);
    assert_relative_eq!(t[2], 1.0, epsilon = 5e-2);
}

#[test]
fn square_pose_scales_with_marker_size() {
    let norm = [[-0.5f32, 0.5], [0.5, 0.5], [0.5, -0.5], [-0.5, -0.5]];

    // same observation, twice the physical side length: twice the depth
    let small = solve_square(&norm, 1.0).expect("side 1.0 should solve");
    let large = solve_square(&norm, 2.0).expect("side 2.0 should solve");
    assert_relative_eq!(large.translation[2], 2.0 * small.translation[2], epsilon = 1e-3);
}

#[test]
fn square_object_points_span_the_side_length() {
    let pts = square_object_points(1.75);
    assert_relative_eq!(pts[1][0] - pts[0][0], 1.75);
    assert_relative_eq!(pts[0][1] - pts[3][1], 1.75);
    assert!(pts.iter().all(|p| p[2] == 0.0));
}
