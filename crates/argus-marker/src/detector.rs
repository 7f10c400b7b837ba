use argus_calib::CameraModel;
use argus_image::{draw::draw_polygon, GrayImage, Image};
use argus_pnp::{all_positive_depths, solve_square, square_object_points};
use argus_pose::{PoseEstimate, PoseEstimator};

use crate::decode::{decode_quad, MarkerDetection};
use crate::errors::MarkerError;
use crate::family::TagFamily;
use crate::quad::{fit_quad, Quad};
use crate::segmentation::find_dark_clusters;
use crate::threshold::adaptive_threshold;

/// Tunables of the marker detector.
#[derive(Debug, Clone)]
pub struct MarkerDetectorConfig {
    /// Tile size of the adaptive threshold, in pixels.
    pub tile_size: usize,
    /// Minimum local contrast for a tile to be binarized.
    pub min_contrast: u8,
    /// Minimum pixel count for a dark cluster to become a candidate.
    pub min_cluster_pixels: usize,
    /// Minimum quad side length in pixels.
    pub min_side: f32,
    /// Maximum payload bit errors corrected by the dictionary lookup.
    pub max_hamming: u32,
}

impl Default for MarkerDetectorConfig {
    fn default() -> Self {
        Self {
            tile_size: 4,
            min_contrast: 20,
            min_cluster_pixels: 24,
            min_side: 8.0,
            max_hamming: 1,
        }
    }
}

/// Per-frame diagnostics, useful when tuning the detector.
#[derive(Debug, Clone, Default)]
pub struct DetectionStats {
    /// Dark clusters that passed the size filter.
    pub clusters: usize,
    /// Clusters that survived quad fitting.
    pub quads: usize,
    /// Quads with a dictionary match.
    pub decoded: usize,
    /// Candidates that fit a quad but failed payload decoding; an
    /// overlay of these shows where the detector looked and gave up.
    pub rejected_quads: Vec<Quad>,
}

/// Detects and decodes fiducial markers in grayscale frames.
///
/// The binarization buffer is reused across frames of the same size.
pub struct MarkerDetector {
    family: TagFamily,
    config: MarkerDetectorConfig,
    bin: Option<GrayImage>,
}

impl MarkerDetector {
    /// Create a detector for the given family with default tunables.
    pub fn new(family: TagFamily) -> Self {
        Self::with_config(family, MarkerDetectorConfig::default())
    }

    /// Create a detector with explicit tunables.
    pub fn with_config(family: TagFamily, config: MarkerDetectorConfig) -> Self {
        Self {
            family,
            config,
            bin: None,
        }
    }

    /// The family this detector decodes against.
    pub fn family(&self) -> &TagFamily {
        &self.family
    }

    /// Detect all markers in a frame.
    pub fn detect(&mut self, gray: &GrayImage) -> Result<Vec<MarkerDetection>, MarkerError> {
        Ok(self.detect_with_stats(gray)?.0)
    }

    /// Detect all markers, also returning pipeline counters.
    pub fn detect_with_stats(
        &mut self,
        gray: &GrayImage,
    ) -> Result<(Vec<MarkerDetection>, DetectionStats), MarkerError> {
        let bin = self
            .bin
            .get_or_insert_with(|| GrayImage::from_size_val(gray.size(), 0u8));
        if bin.size() != gray.size() {
            *bin = GrayImage::from_size_val(gray.size(), 0u8);
        }
        adaptive_threshold(gray, bin, self.config.tile_size, self.config.min_contrast)?;

        let clusters = find_dark_clusters(bin, self.config.min_cluster_pixels);

        let mut stats = DetectionStats {
            clusters: clusters.len(),
            ..Default::default()
        };
        let mut detections = Vec::new();
        for cluster in &clusters {
            let Some(quad) = fit_quad(cluster, gray.size(), self.config.min_side) else {
                continue;
            };
            stats.quads += 1;

            if let Some(detection) =
                decode_quad(gray, &quad, &self.family, self.config.max_hamming)
            {
                stats.decoded += 1;
                detections.push(detection);
            } else {
                stats.rejected_quads.push(quad);
            }
        }

        log::trace!(
            "marker detection: {} clusters, {} quads, {} decoded, {} rejected",
            stats.clusters,
            stats.quads,
            stats.decoded,
            stats.rejected_quads.len()
        );
        Ok((detections, stats))
    }
}

/// Draw detected marker outlines into an RGB frame.
pub fn draw_detections(img: &mut Image<u8, 3>, detections: &[MarkerDetection], color: [u8; 3]) {
    for detection in detections {
        draw_polygon(img, &detection.corners, color);
    }
}

/// Estimates the camera pose from a single fiducial marker.
///
/// Any marker of the configured family is accepted; when several are
/// visible the last detection wins.
pub struct MarkerPoseEstimator {
    detector: MarkerDetector,
    camera: CameraModel,
    side_length: f32,
}

impl MarkerPoseEstimator {
    /// Default physical marker side length, in scene units.
    pub const DEFAULT_SIDE_LENGTH: f32 = 1.75;

    /// Create an estimator with the default marker side length.
    pub fn new(detector: MarkerDetector, camera: CameraModel) -> Self {
        Self::with_side_length(detector, camera, Self::DEFAULT_SIDE_LENGTH)
    }

    /// Create an estimator for markers of a specific physical size.
    pub fn with_side_length(detector: MarkerDetector, camera: CameraModel, side_length: f32) -> Self {
        Self {
            detector,
            camera,
            side_length,
        }
    }

    fn estimate_from_detection(&self, detection: &MarkerDetection) -> Option<PoseEstimate> {
        let normalized = self.camera.undistort_normalized_points(&detection.corners);
        let corners: [[f32; 2]; 4] = [normalized[0], normalized[1], normalized[2], normalized[3]];

        let result = match solve_square(&corners, self.side_length) {
            Ok(result) => result,
            Err(err) => {
                log::debug!("pose solve failed for marker {}: {err}", detection.id);
                return None;
            }
        };

        let object = square_object_points(self.side_length);
        if !all_positive_depths(&result.rotation, &result.translation, &object) {
            log::debug!("marker {} pose places corners behind the camera", detection.id);
            return None;
        }
        Some(PoseEstimate::from_pnp(&result))
    }
}

impl PoseEstimator for MarkerPoseEstimator {
    fn detect_and_estimate(&mut self, frame: &GrayImage) -> PoseEstimate {
        let detections = match self.detector.detect(frame) {
            Ok(detections) => detections,
            Err(err) => {
                log::warn!("marker detection failed: {err}");
                return PoseEstimate::invalid();
            }
        };

        detections
            .iter()
            .rev()
            .find_map(|d| self.estimate_from_detection(d))
            .unwrap_or_else(PoseEstimate::invalid)
    }
}
