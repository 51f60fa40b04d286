//! Feature extraction through the file-based analyzer API.

use std::fs;
use std::path::Path;

use eye_features::{
    BoundingBox, Detection, Error, EyeAnalyzer, Result, StaticDetections, DEFAULT_SYMMETRY,
};
use image::DynamicImage;

/// 100x40 grayscale PNG: left half intensity 40, right half 200.
fn write_two_tone(path: &Path) {
    image::GrayImage::from_fn(100, 40, |x, _| image::Luma([if x < 50 { 40 } else { 200 }]))
        .save(path)
        .expect("failed to write test image");
}

fn det(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Detection {
    Detection::new(BoundingBox::new(x1, y1, x2, y2), confidence)
}

#[test]
fn analyzes_image_file_with_two_eyes() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("face.png");
    write_two_tone(&image_path);

    // Detector reports the right eye first.
    let analyzer = EyeAnalyzer::new(StaticDetections::new(vec![
        det(60.0, 10.0, 80.0, 20.0, 0.7),
        det(10.0, 10.0, 30.0, 25.0, 0.9),
    ]));
    let result = analyzer.analyze_path(&image_path).unwrap();

    assert_eq!(result.eye_count, 2);
    let left = &result.features[0];
    let right = &result.features[1];

    assert_eq!(left.bbox.x_min, 10.0);
    assert!((left.openness - 0.75).abs() < 1e-6);
    assert!((left.brightness - 40.0).abs() < 1.0);
    assert_eq!(left.confidence, 0.9);

    assert_eq!(right.bbox.x_min, 60.0);
    assert!((right.openness - 0.5).abs() < 1e-6);
    assert!((right.brightness - 200.0).abs() < 1.0);

    // Areas 300 and 200.
    assert!((result.symmetry_score - 0.8).abs() < 1e-4);
}

#[test]
fn detections_loaded_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("face.png");
    write_two_tone(&image_path);
    let detections_path = dir.path().join("boxes.json");
    fs::write(
        &detections_path,
        r#"[{"bbox": [0, 0, 10, 10], "confidence": 0.95}, {"bbox": [50, 0, 60, 5], "confidence": 0.85}]"#,
    )
    .unwrap();

    let analyzer = EyeAnalyzer::new(StaticDetections::load(&detections_path).unwrap());
    let result = analyzer.analyze_path(&image_path).unwrap();

    assert_eq!(result.eye_count, 2);
    assert!((result.symmetry_score - 2.0 / 3.0).abs() < 1e-4);
}

#[test]
fn unreadable_image_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("face.png");
    fs::write(&bogus, b"definitely not a png").unwrap();

    let analyzer = EyeAnalyzer::new(StaticDetections::new(vec![det(0.0, 0.0, 5.0, 5.0, 1.0)]));
    assert!(analyzer.analyze_path(&bogus).is_err());
    assert!(matches!(
        analyzer.analyze_path(dir.path().join("missing.png")),
        Err(Error::Image(_))
    ));
}

#[test]
fn detector_errors_propagate() {
    let analyzer = EyeAnalyzer::new(|_: &DynamicImage| -> Result<Vec<Detection>> {
        Err(Error::InvalidConfig("model not loaded".to_string()))
    });
    let image = DynamicImage::new_luma8(10, 10);
    assert!(matches!(
        analyzer.analyze_image(&image),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn no_detections_gives_default_symmetry() {
    let analyzer = EyeAnalyzer::new(StaticDetections::default());
    let result = analyzer
        .analyze_image(&DynamicImage::new_rgb8(20, 20))
        .unwrap();

    assert_eq!(result.eye_count, 0);
    assert!(result.features.is_empty());
    assert_eq!(result.symmetry_score, DEFAULT_SYMMETRY);
}

#[test]
fn caller_facing_json_keys() {
    let analyzer = EyeAnalyzer::new(StaticDetections::new(vec![det(2.0, 2.0, 6.0, 4.0, 0.5)]));
    let result = analyzer
        .analyze_image(&DynamicImage::new_luma8(10, 10))
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();

    let object = value.as_object().unwrap();
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["eye_count", "features", "symmetry_score"]);

    let feature = value["features"][0].as_object().unwrap();
    let mut keys: Vec<_> = feature.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["bbox", "brightness", "confidence", "openness"]);
    assert_eq!(value["features"][0]["bbox"].as_array().unwrap().len(), 4);
}
