//! # eye-features
//!
//! Eye-region geometry for a detector-based eye analysis pipeline.
//!
//! This crate provides:
//! - **Label generation**: turns 68-point facial landmark annotations into
//!   normalized eye bounding-box labels for training an eye detector, and lays
//!   out a train/val dataset on disk
//! - **Feature extraction**: given an image and the boxes an eye detector
//!   found in it, measures per-eye openness and brightness plus a left/right
//!   area symmetry score
//!
//! The detector itself is external. It is plugged in through the
//! [`EyeDetector`] trait.
//!
//! ## Labels from landmarks
//!
//! ```rust
//! use eye_features::{eye_labels, LandmarkSet, Point};
//!
//! let mut points = vec![Point::new(50.0, 20.0); 68];
//! for i in 0..6 {
//!     points[36 + i] = Point::new(10.0 + 4.0 * i as f32, 10.0 + (i % 2) as f32 * 10.0);
//!     points[42 + i] = Point::new(50.0 + 4.0 * i as f32, 10.0 + (i % 2) as f32 * 10.0);
//! }
//! let landmarks = LandmarkSet::new(points).unwrap();
//!
//! let [left, right] = eye_labels(&landmarks, 100, 40);
//! assert!(left.x_center < right.x_center);
//! println!("{left}\n{right}");
//! ```
//!
//! ## Features from detections
//!
//! ```rust
//! use eye_features::{extract_features, BoundingBox, Detection, GrayImage};
//!
//! let image = GrayImage::from_fn(100, 40, |x, y| ((x + y) % 256) as u8);
//! let detections = [
//!     Detection::new(BoundingBox::new(50.0, 10.0, 70.0, 20.0), 0.91),
//!     Detection::new(BoundingBox::new(10.0, 10.0, 30.0, 20.0), 0.88),
//! ];
//!
//! let result = extract_features(&image, &detections);
//! assert_eq!(result.eye_count, 2);
//! assert_eq!(result.features[0].bbox.x_min, 10.0);
//! assert!((result.symmetry_score - 1.0).abs() < 1e-6);
//! ```

mod analysis;
mod annotation;
mod dataset;
mod detector;
mod error;
mod features;
mod labels;
mod types;

pub use analysis::{
    area_symmetry, extract_features, measure, openness, AnalysisResult, EyeAnalyzer,
    FeatureRecord, DEFAULT_SYMMETRY, SYMMETRY_EPSILON,
};
pub use annotation::{find_annotation, load_landmarks, parse_points};
pub use dataset::{
    convert_dataset, convert_image, discover_images, prepare_output, write_manifest,
    ConversionReport, DatasetConfig, Split, MANIFEST_NAME,
};
pub use detector::{EyeDetector, StaticDetections};
pub use error::{Error, Result};
pub use features::{crop_region, mean_intensity, GrayImage, ImageAccess, PixelRegion};
pub use labels::{eye_box, eye_labels, format_labels, EYE_PADDING};
pub use types::{
    BoundingBox, Detection, LandmarkSet, NormalizedLabel, Point, EYE_CLASS_ID, EYE_POINTS,
    LANDMARK_COUNT, LEFT_EYE, RIGHT_EYE,
};
