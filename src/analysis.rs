//! Per-eye features from detector output.
//!
//! For each detected box this measures openness (height / width) and mean
//! brightness of the cropped region, then scores how similar the two eye
//! areas are when exactly two boxes survive.

use std::path::Path;

use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::detector::EyeDetector;
use crate::error::Result;
use crate::features::{crop_region, mean_intensity, GrayImage, ImageAccess};
use crate::types::{BoundingBox, Detection};

/// Added to the symmetry denominator so two zero-area boxes don't divide by zero.
pub const SYMMETRY_EPSILON: f32 = 1e-6;

/// Symmetry reported whenever the image does not have exactly two eyes.
///
/// Note this reads as "perfectly symmetric" for 0, 1 or 3+ detections, which
/// hides rather than flags the missing comparison.
pub const DEFAULT_SYMMETRY: f32 = 1.0;

/// Measurements for one detected eye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub bbox: BoundingBox,
    /// Height over width of the box. Dimensionless, 0 for a zero-width box.
    pub openness: f32,
    /// Mean luminance of the crop, `[0, 255]`.
    pub brightness: f32,
    pub confidence: f32,
}

/// Everything measured for one image.
///
/// This serializes to the shape callers depend on: `eye_count`, `features`
/// (each with `bbox`, `openness`, `brightness`, `confidence`) and
/// `symmetry_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub eye_count: usize,
    pub features: Vec<FeatureRecord>,
    pub symmetry_score: f32,
}

/// Openness ratio of a box: `height / width`, or 0 when the width is not positive.
pub fn openness(bbox: &BoundingBox) -> f32 {
    let w = bbox.width();
    if w > 0.0 {
        bbox.height() / w
    } else {
        0.0
    }
}

/// Measure one detection, or `None` if its crop holds no pixels.
pub fn measure<I: ImageAccess>(image: &I, detection: &Detection) -> Option<FeatureRecord> {
    let bbox = detection.bbox;
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return None;
    }
    let region = crop_region(&bbox, image.width(), image.height())?;

    Some(FeatureRecord {
        bbox,
        openness: openness(&bbox),
        brightness: mean_intensity(image, &region),
        confidence: detection.confidence,
    })
}

/// Area similarity of two eyes in `[0, 1]`, 1 meaning equal areas.
pub fn area_symmetry(left: &BoundingBox, right: &BoundingBox) -> f32 {
    let (a_left, a_right) = (left.area(), right.area());
    let size_diff = (a_left - a_right).abs() / (a_left + a_right + SYMMETRY_EPSILON);
    let score = (1.0 - size_diff).max(0.0);
    debug_assert!(
        (0.0..=1.0).contains(&score),
        "symmetry score {score} out of range"
    );
    score
}

/// Compute features for every usable detection and the pairwise symmetry.
///
/// Degenerate detections are dropped. With exactly two survivors the records
/// are ordered by `x_min` ascending and the first is treated as the left eye;
/// this is purely positional. Otherwise detector order is kept and the
/// symmetry is [`DEFAULT_SYMMETRY`].
pub fn extract_features<I: ImageAccess>(image: &I, detections: &[Detection]) -> AnalysisResult {
    let mut features: Vec<FeatureRecord> = detections
        .iter()
        .filter_map(|det| {
            let record = measure(image, det);
            if record.is_none() {
                debug!("dropping degenerate detection {:?}", det.bbox);
            }
            record
        })
        .collect();

    let symmetry_score = if features.len() == 2 {
        features.sort_by(|a, b| a.bbox.x_min.total_cmp(&b.bbox.x_min));
        area_symmetry(&features[0].bbox, &features[1].bbox)
    } else {
        DEFAULT_SYMMETRY
    };

    AnalysisResult {
        eye_count: features.len(),
        features,
        symmetry_score,
    }
}

/// Runs a detector over images and extracts eye features from its output.
pub struct EyeAnalyzer<D> {
    detector: D,
}

impl<D: EyeDetector> EyeAnalyzer<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Analyze an image file. An unreadable or undecodable image is an error.
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult> {
        let path = path.as_ref();
        debug!("analyzing {}", path.display());
        let image = image::open(path)?;
        self.analyze_image(&image)
    }

    pub fn analyze_image(&self, image: &DynamicImage) -> Result<AnalysisResult> {
        let detections = self.detector.detect(image)?;
        let gray = GrayImage::from_dynamic(image);
        let result = extract_features(&gray, &detections);
        debug!(
            "{} of {} detections kept, symmetry {:.3}",
            result.eye_count,
            detections.len(),
            result.symmetry_score
        );
        Ok(result)
    }
}
