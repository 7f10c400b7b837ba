use std::path::Path;

use argus_image::ImageSize;
use serde::Deserialize;

use crate::distortion::PolynomialDistortion;
use crate::error::CalibError;
use crate::intrinsics::CameraIntrinsics;
use crate::projection::projection_from_intrinsics;

/// On-disk calibration file layout.
///
/// The key names mirror the OpenCV calibration tools that produced the
/// original files, so existing calibrations can be converted 1:1 to JSON.
#[derive(Debug, Deserialize)]
struct CalibrationFile {
    camera_matrix: [[f64; 3]; 3],
    distortion_coefficients: Vec<f64>,
    image_width: usize,
    image_height: usize,
}

/// A calibrated camera: intrinsics, distortion and frame size.
///
/// Immutable after load; the whole pipeline shares one instance.
#[derive(Debug, Clone)]
pub struct CameraModel {
    /// Pinhole intrinsic parameters.
    pub intrinsics: CameraIntrinsics,
    /// Lens distortion, `None` for an ideal pinhole.
    pub distortion: Option<PolynomialDistortion>,
    /// Size of the calibrated frame in pixels.
    pub frame_size: ImageSize,
}

impl CameraModel {
    /// Create a camera model without distortion.
    pub fn pinhole(intrinsics: CameraIntrinsics, frame_size: ImageSize) -> Self {
        Self {
            intrinsics,
            distortion: None,
            frame_size,
        }
    }

    /// Create a camera model with distortion.
    pub fn with_distortion(
        intrinsics: CameraIntrinsics,
        distortion: PolynomialDistortion,
        frame_size: ImageSize,
    ) -> Self {
        Self {
            intrinsics,
            distortion: Some(distortion),
            frame_size,
        }
    }

    /// Load a camera model from a JSON calibration file.
    ///
    /// Fails loudly if the file is missing, unreadable or lacks required
    /// keys. No default intrinsics are ever substituted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalibError> {
        let contents = std::fs::read_to_string(path)?;
        let file: CalibrationFile = serde_json::from_str(&contents)?;

        if file.image_width == 0 || file.image_height == 0 {
            return Err(CalibError::InvalidFrameSize(
                file.image_width,
                file.image_height,
            ));
        }

        let mut k = [[0.0f32; 3]; 3];
        for (row, file_row) in k.iter_mut().zip(file.camera_matrix.iter()) {
            for (dst, src) in row.iter_mut().zip(file_row.iter()) {
                *dst = *src as f32;
            }
        }
        let intrinsics = CameraIntrinsics::from_matrix(&k)?;
        let distortion = PolynomialDistortion::from_opencv_vec(&file.distortion_coefficients)?;

        log::info!(
            "loaded calibration: fx={} fy={} cx={} cy={} frame={}x{}",
            intrinsics.fx,
            intrinsics.fy,
            intrinsics.cx,
            intrinsics.cy,
            file.image_width,
            file.image_height
        );

        Ok(Self {
            intrinsics,
            distortion: distortion.has_distortion().then_some(distortion),
            frame_size: ImageSize {
                width: file.image_width,
                height: file.image_height,
            },
        })
    }

    /// Whether the model carries any lens distortion.
    pub fn has_distortion(&self) -> bool {
        self.distortion.is_some_and(|d| d.has_distortion())
    }

    /// Map a distorted pixel coordinate to an undistorted normalized
    /// image coordinate.
    pub fn undistort_normalized(&self, p: [f32; 2]) -> [f32; 2] {
        let [x, y] = self.intrinsics.normalize_point(p);
        match &self.distortion {
            Some(d) => {
                let (xu, yu) = d.undistort(x, y);
                [xu, yu]
            }
            None => [x, y],
        }
    }

    /// Undistort and normalize a batch of pixel coordinates.
    pub fn undistort_normalized_points(&self, points: &[[f32; 2]]) -> Vec<[f32; 2]> {
        points.iter().map(|&p| self.undistort_normalized(p)).collect()
    }

    /// Build the OpenGL-style projection matrix for the given clip planes.
    ///
    /// Pure in its inputs: the result depends only on the intrinsics, the
    /// frame size and the clip planes, and is meant to be computed once.
    pub fn projection_matrix(&self, near: f32, far: f32) -> Result<glam::Mat4, CalibError> {
        if !(near > 0.0 && near < far) {
            return Err(CalibError::InvalidClipPlanes { near, far });
        }
        Ok(projection_from_intrinsics(
            &self.intrinsics,
            self.frame_size,
            near,
            far,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_calibration(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(json.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn load_valid_calibration() -> Result<(), CalibError> {
        let file = write_calibration(
            r#"{
                "camera_matrix": [[800.0, 0.0, 320.0], [0.0, 800.0, 240.0], [0.0, 0.0, 1.0]],
                "distortion_coefficients": [0.1, 0.01, 0.0, 0.0],
                "image_width": 640,
                "image_height": 480
            }"#,
        );
        let model = CameraModel::load(file.path())?;
        assert_eq!(model.intrinsics.fx, 800.0);
        assert_eq!(model.frame_size.width, 640);
        assert!(model.has_distortion());
        Ok(())
    }

    #[test]
    fn zero_distortion_collapses_to_pinhole() -> Result<(), CalibError> {
        let file = write_calibration(
            r#"{
                "camera_matrix": [[800.0, 0.0, 320.0], [0.0, 800.0, 240.0], [0.0, 0.0, 1.0]],
                "distortion_coefficients": [0.0, 0.0, 0.0, 0.0],
                "image_width": 640,
                "image_height": 480
            }"#,
        );
        let model = CameraModel::load(file.path())?;
        assert!(!model.has_distortion());
        Ok(())
    }

    #[test]
    fn missing_file_is_fatal() {
        let result = CameraModel::load("/nonexistent/calibration.json");
        assert!(matches!(result, Err(CalibError::Io(_))));
    }

    #[test]
    fn missing_keys_are_fatal() {
        let file = write_calibration(r#"{ "camera_matrix": [[1.0,0.0,0.0],[0.0,1.0,0.0],[0.0,0.0,1.0]] }"#);
        let result = CameraModel::load(file.path());
        assert!(matches!(result, Err(CalibError::Parse(_))));
    }

    #[test]
    fn clip_plane_validation() {
        let model = CameraModel::pinhole(
            CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0),
            ImageSize {
                width: 640,
                height: 480,
            },
        );
        assert!(model.projection_matrix(1000.0, 0.01).is_err());
        assert!(model.projection_matrix(0.0, 10.0).is_err());
        assert!(model.projection_matrix(0.01, 1000.0).is_ok());
    }
}
