use crate::error::CalibError;

/// Intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x direction, in pixels.
    pub fx: f32,
    /// Focal length in y direction, in pixels.
    pub fy: f32,
    /// Principal point x coordinate, in pixels.
    pub cx: f32,
    /// Principal point y coordinate, in pixels.
    pub cy: f32,
}

impl CameraIntrinsics {
    /// Create camera intrinsics from focal lengths and principal point.
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Create camera intrinsics from a 3x3 intrinsics matrix.
    ///
    /// The matrix must have the form `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.
    pub fn from_matrix(k: &[[f32; 3]; 3]) -> Result<Self, CalibError> {
        if k[0][1] != 0.0 || k[1][0] != 0.0 || k[2][0] != 0.0 || k[2][1] != 0.0 || k[2][2] != 1.0 {
            return Err(CalibError::InvalidIntrinsics(
                "camera matrix must have form [[fx, 0, cx], [0, fy, cy], [0, 0, 1]]".to_string(),
            ));
        }
        if k[0][0] <= 0.0 || k[1][1] <= 0.0 {
            return Err(CalibError::InvalidIntrinsics(
                "focal lengths must be positive".to_string(),
            ));
        }
        Ok(Self {
            fx: k[0][0],
            fy: k[1][1],
            cx: k[0][2],
            cy: k[1][2],
        })
    }

    /// Convert to a 3x3 intrinsics matrix.
    pub fn to_matrix(&self) -> [[f32; 3]; 3] {
        [
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Map a pixel coordinate to a normalized image coordinate (`K^{-1} * p`).
    #[inline]
    pub fn normalize_point(&self, p: [f32; 2]) -> [f32; 2] {
        [(p[0] - self.cx) / self.fx, (p[1] - self.cy) / self.fy]
    }

    /// Map a normalized image coordinate back to pixels.
    #[inline]
    pub fn denormalize_point(&self, p: [f32; 2]) -> [f32; 2] {
        [p[0] * self.fx + self.cx, p[1] * self.fy + self.cy]
    }
}
