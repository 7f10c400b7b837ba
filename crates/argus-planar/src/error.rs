use argus_image::ImageError;

/// Errors that can occur in the planar tracking pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PlanarError {
    /// Error related to image storage or shape.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The reference image yielded no usable features.
    #[error("reference image yielded no features, registration refused")]
    FeaturelessReference,

    /// The plane scale must be a positive number.
    #[error("invalid plane scale {0}, must be positive")]
    InvalidPlaneScale(f32),
}
