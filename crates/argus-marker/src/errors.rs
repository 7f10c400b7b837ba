use argus_image::ImageError;

/// Errors that can occur in the marker detection pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    /// Error related to image storage or shape.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The threshold tile size must be at least 2 pixels.
    #[error("invalid tile size {0}, must be at least 2")]
    InvalidTileSize(usize),

    /// The image is smaller than a single threshold tile.
    #[error("image {width}x{height} is smaller than one {tile_size}x{tile_size} tile")]
    ImageTooSmall {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
        /// Requested tile size in pixels.
        tile_size: usize,
    },

    /// The requested marker id is not in the family dictionary.
    #[error("marker id {id} out of range for family {family} ({count} codes)")]
    UnknownMarkerId {
        /// Requested marker id.
        id: usize,
        /// Family name.
        family: &'static str,
        /// Number of codes in the family.
        count: usize,
    },
}
