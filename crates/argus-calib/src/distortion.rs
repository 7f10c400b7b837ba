use crate::error::CalibError;

/// Brown-Conrady polynomial lens distortion.
///
/// Coefficients follow the OpenCV ordering `(k1, k2, p1, p2, k3, k4, k5, k6)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct PolynomialDistortion {
    /// Radial distortion coefficients.
    pub k1: f32,
    pub k2: f32,
    pub k3: f32,
    pub k4: f32,
    pub k5: f32,
    pub k6: f32,
    /// Tangential distortion coefficients.
    pub p1: f32,
    pub p2: f32,
}

impl PolynomialDistortion {
    /// Distortion with only the first two radial coefficients.
    pub fn radial(k1: f32, k2: f32) -> Self {
        Self {
            k1,
            k2,
            ..Default::default()
        }
    }

    /// Build from an OpenCV-layout coefficient vector of 4, 5, 8 or 12 elements.
    ///
    /// Twelve-element vectors carry four trailing thin-prism terms which this
    /// model does not represent; they are accepted and ignored.
    pub fn from_opencv_vec(coeffs: &[f64]) -> Result<Self, CalibError> {
        if !matches!(coeffs.len(), 4 | 5 | 8 | 12) {
            return Err(CalibError::InvalidDistortionLength(coeffs.len()));
        }
        let at = |i: usize| coeffs.get(i).copied().unwrap_or(0.0) as f32;
        Ok(Self {
            k1: at(0),
            k2: at(1),
            p1: at(2),
            p2: at(3),
            k3: at(4),
            k4: at(5),
            k5: at(6),
            k6: at(7),
        })
    }

    /// Whether any coefficient is non-zero.
    pub fn has_distortion(&self) -> bool {
        self.k1 != 0.0
            || self.k2 != 0.0
            || self.k3 != 0.0
            || self.k4 != 0.0
            || self.k5 != 0.0
            || self.k6 != 0.0
            || self.p1 != 0.0
            || self.p2 != 0.0
    }

    /// Apply the distortion model to a normalized image coordinate.
    pub fn distort(&self, x: f32, y: f32) -> (f32, f32) {
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;

        let kr = (1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6)
            / (1.0 + self.k4 * r2 + self.k5 * r4 + self.k6 * r6);

        let x2 = 2.0 * x;
        let y2 = 2.0 * y;
        let xy2 = x2 * y;
        let xd = x * kr + xy2 * self.p1 + self.p2 * (r2 + x2 * x);
        let yd = y * kr + self.p1 * (r2 + y2 * y) + xy2 * self.p2;
        (xd, yd)
    }

    /// Invert the distortion model for a normalized image coordinate by
    /// fixed-point iteration.
    pub fn undistort(&self, x: f32, y: f32) -> (f32, f32) {
        const MAX_ITERATIONS: usize = 10;
        const EPSILON: f32 = 1e-6;

        let mut xu = x;
        let mut yu = y;
        for _ in 0..MAX_ITERATIONS {
            let (xd, yd) = self.distort(xu, yu);
            let dx = x - xd;
            let dy = y - yd;
            xu += dx;
            yu += dy;
            if dx.abs() < EPSILON && dy.abs() < EPSILON {
                break;
            }
        }
        (xu, yu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opencv_lengths() -> Result<(), CalibError> {
        for len in [4, 5, 8, 12] {
            let coeffs = vec![0.01; len];
            let d = PolynomialDistortion::from_opencv_vec(&coeffs)?;
            assert!(d.has_distortion());
        }
        assert!(PolynomialDistortion::from_opencv_vec(&[0.0; 3]).is_err());
        Ok(())
    }

    #[test]
    fn opencv_ordering() -> Result<(), CalibError> {
        let d = PolynomialDistortion::from_opencv_vec(&[0.1, 0.2, 0.3, 0.4, 0.5])?;
        assert_eq!(d.k1, 0.1);
        assert_eq!(d.k2, 0.2);
        assert_eq!(d.p1, 0.3);
        assert_eq!(d.p2, 0.4);
        assert_eq!(d.k3, 0.5);
        Ok(())
    }

    #[test]
    fn distort_undistort_roundtrip() {
        let d = PolynomialDistortion::radial(0.1, 0.01);
        let (xd, yd) = d.distort(0.2, -0.15);
        let (xu, yu) = d.undistort(xd, yd);
        assert!((xu - 0.2).abs() < 1e-5);
        assert!((yu + 0.15).abs() < 1e-5);
    }
}
