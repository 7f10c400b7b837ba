use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::homography::{apply_homography, find_homography_dlt, homography_4pt};
use crate::types::PnPError;

/// Parameters for RANSAC homography estimation.
#[derive(Debug, Clone)]
pub struct HomographyRansacParams {
    /// Maximum number of RANSAC iterations.
    pub max_iterations: usize,
    /// Forward transfer error threshold (pixels) to classify an inlier.
    pub inlier_threshold: f64,
    /// Desired probability that at least one sample set is outlier-free.
    pub confidence: f64,
    /// Optional fixed seed for reproducible sampling.
    pub random_seed: Option<u64>,
    /// Whether to refit on all inliers with the n-point DLT solver.
    pub refine: bool,
}

impl Default for HomographyRansacParams {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            inlier_threshold: 3.0,
            confidence: 0.995,
            random_seed: None,
            refine: true,
        }
    }
}

/// Result of RANSAC homography estimation.
#[derive(Debug, Clone)]
pub struct HomographyRansacResult {
    /// Best homography found, mapping `src` to `dst`.
    pub homography: [[f64; 3]; 3],
    /// Indices of the inlier correspondences.
    pub inliers: Vec<usize>,
}

/// Estimate a homography robustly from noisy correspondences.
///
/// Samples 4-point minimal sets, scores candidates by forward transfer
/// error and adapts the iteration count from the running inlier ratio,
/// then optionally refits on the full consensus set.
pub fn find_homography_ransac(
    src: &[[f64; 2]],
    dst: &[[f64; 2]],
    params: &HomographyRansacParams,
) -> Result<HomographyRansacResult, PnPError> {
    let n = src.len();
    if n != dst.len() {
        return Err(PnPError::MismatchedArrayLengths {
            left_name: "src points",
            left_len: src.len(),
            right_name: "dst points",
            right_len: dst.len(),
        });
    }
    if n < 4 {
        return Err(PnPError::InsufficientCorrespondences {
            required: 4,
            actual: n,
        });
    }

    let mut rng: StdRng = match params.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let threshold_sq = params.inlier_threshold * params.inlier_threshold;

    let mut indices: Vec<usize> = (0..n).collect();
    let mut best_inliers: Vec<usize> = Vec::new();
    let mut best_homo = [[0.0f64; 3]; 3];

    let mut iter = 0usize;
    let mut required_iters = params.max_iterations;

    while iter < required_iters {
        iter += 1;

        indices.shuffle(&mut rng);
        let sample = &indices[..4];

        let s_min = [src[sample[0]], src[sample[1]], src[sample[2]], src[sample[3]]];
        let d_min = [dst[sample[0]], dst[sample[1]], dst[sample[2]], dst[sample[3]]];

        let mut homo = [[0.0f64; 3]; 3];
        if homography_4pt(&s_min, &d_min, &mut homo).is_err() {
            // collinear or otherwise degenerate sample
            continue;
        }

        let inliers = classify_inliers(src, dst, &homo, threshold_sq);

        if inliers.len() > best_inliers.len() {
            best_inliers = inliers;
            best_homo = homo;

            // adapt the remaining iteration budget to the inlier ratio
            let w = best_inliers.len() as f64 / n as f64;
            if w > 1e-6 && w < 1.0 {
                let ws = w.powi(4);
                if ws > 1e-12 && ws < 1.0 - 1e-12 {
                    let est = ((1.0 - params.confidence).max(1e-12).ln() / (1.0 - ws).ln()).ceil();
                    if est.is_finite() && est > 0.0 {
                        required_iters = required_iters.min(est as usize);
                    }
                } else if w >= 0.95 {
                    required_iters = iter;
                }
            } else if (w - 1.0).abs() < 1e-12 {
                required_iters = iter;
            }
        }
    }

    if best_inliers.len() < 4 {
        return Err(PnPError::InsufficientInliers {
            required: 4,
            actual: best_inliers.len(),
        });
    }

    let homography = if params.refine {
        let s_in: Vec<[f64; 2]> = best_inliers.iter().map(|&i| src[i]).collect();
        let d_in: Vec<[f64; 2]> = best_inliers.iter().map(|&i| dst[i]).collect();
        find_homography_dlt(&s_in, &d_in)?
    } else {
        best_homo
    };

    Ok(HomographyRansacResult {
        homography,
        inliers: best_inliers,
    })
}

fn classify_inliers(
    src: &[[f64; 2]],
    dst: &[[f64; 2]],
    homo: &[[f64; 3]; 3],
    threshold_sq: f64,
) -> Vec<usize> {
    let mut inliers = Vec::new();
    for (idx, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let Some(mapped) = apply_homography(homo, *s) else {
            continue;
        };
        let du = mapped[0] - d[0];
        let dv = mapped[1] - d[1];
        if du * du + dv * dv < threshold_sq {
            inliers.push(idx);
        }
    }
    inliers
}
