/// Errors produced while loading or using a camera calibration.
///
/// All variants are fatal at startup: the pipeline must not run with an
/// unconfigured camera model.
#[derive(Debug, thiserror::Error)]
pub enum CalibError {
    /// The calibration file could not be read.
    #[error("failed to read calibration file: {0}")]
    Io(#[from] std::io::Error),

    /// The calibration file is not valid JSON or misses required keys.
    #[error("failed to parse calibration file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The camera matrix does not have the pinhole form.
    #[error("invalid camera matrix: {0}")]
    InvalidIntrinsics(String),

    /// The distortion coefficient vector has an unsupported length.
    #[error("distortion coefficients must have 4, 5, 8 or 12 elements, got {0}")]
    InvalidDistortionLength(usize),

    /// The frame size is zero in one or both dimensions.
    #[error("invalid frame size: {0}x{1}")]
    InvalidFrameSize(usize, usize),

    /// The near/far clip planes do not satisfy `0 < near < far`.
    #[error("invalid clip planes: near={near}, far={far}")]
    InvalidClipPlanes {
        /// Near clip plane distance.
        near: f32,
        /// Far clip plane distance.
        far: f32,
    },
}
