//! The eye detector seam.
//!
//! Detection itself is done by an external model. Anything that can turn an
//! image into boxes with confidences implements [`EyeDetector`], so feature
//! extraction never depends on how the boxes were produced.

use std::fs;
use std::path::Path;

use image::DynamicImage;

use crate::error::Result;
use crate::types::Detection;

pub trait EyeDetector {
    /// Detect eye boxes in `image`, in the detector's own output order.
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

impl<F> EyeDetector for F
where
    F: Fn(&DynamicImage) -> Result<Vec<Detection>>,
{
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        self(image)
    }
}

/// A detector that returns a precomputed list regardless of the image.
///
/// Used to feed detections produced elsewhere (for example a JSON dump of a
/// model's output) into the feature extractor.
#[derive(Debug, Clone, Default)]
pub struct StaticDetections {
    detections: Vec<Detection>,
}

impl StaticDetections {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Load `[{"bbox": [x1, y1, x2, y2], "confidence": c}, ...]` from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let detections = serde_json::from_str(&contents)?;
        Ok(Self::new(detections))
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl EyeDetector for StaticDetections {
    fn detect(&self, _image: &DynamicImage) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}
