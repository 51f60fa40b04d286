use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of points in the iBUG 68-point landmark scheme.
pub const LANDMARK_COUNT: usize = 68;

/// Landmark indices outlining the left eye (points 37-42 in 1-based numbering).
pub const LEFT_EYE: Range<usize> = 36..42;

/// Landmark indices outlining the right eye (points 43-48 in 1-based numbering).
pub const RIGHT_EYE: Range<usize> = 42..48;

/// Contour points per eye.
pub const EYE_POINTS: usize = 6;

/// Class id written for every eye label. The detector is trained on a single class.
pub const EYE_CLASS_ID: u32 = 0;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A full 68-point facial annotation.
///
/// The point count is checked on construction, so index-based region access
/// (see [`LEFT_EYE`], [`RIGHT_EYE`]) never goes out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(Error::LandmarkCount {
                expected: LANDMARK_COUNT,
                found: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn left_eye(&self) -> [Point; EYE_POINTS] {
        self.eye(LEFT_EYE.start)
    }

    pub fn right_eye(&self) -> [Point; EYE_POINTS] {
        self.eye(RIGHT_EYE.start)
    }

    fn eye(&self, start: usize) -> [Point; EYE_POINTS] {
        std::array::from_fn(|i| self.points[start + i])
    }
}

/// An axis-aligned box given by its corners, in pixel space.
///
/// Serialized as `[x_min, y_min, x_max, y_max]`, the layout detector output uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub const fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Zero-size box at `p`.
    pub const fn at(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Smallest box containing both `self` and `p`.
    pub fn including(&self, p: Point) -> Self {
        Self::new(
            self.x_min.min(p.x),
            self.y_min.min(p.y),
            self.x_max.max(p.x),
            self.y_max.max(p.y),
        )
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Grow each side by `factor` times the box extent along that axis.
    pub fn padded(&self, factor: f32) -> Self {
        let pad_x = self.width() * factor;
        let pad_y = self.height() * factor;
        Self::new(
            self.x_min - pad_x,
            self.y_min - pad_y,
            self.x_max + pad_x,
            self.y_max + pad_y,
        )
    }

    /// Clamp every edge into `[0, width] x [0, height]`.
    ///
    /// A box lying entirely outside the image collapses onto the nearest
    /// image edge with zero extent, so `x_min <= x_max` still holds.
    pub fn clamped(&self, width: f32, height: f32) -> Self {
        Self::new(
            self.x_min.clamp(0.0, width),
            self.y_min.clamp(0.0, height),
            self.x_max.clamp(0.0, width),
            self.y_max.clamp(0.0, height),
        )
    }

    /// Express the box as a center/size label relative to the image size.
    pub fn normalize(&self, image_width: f32, image_height: f32) -> NormalizedLabel {
        let center = self.center();
        NormalizedLabel {
            class_id: EYE_CLASS_ID,
            x_center: center.x / image_width,
            y_center: center.y / image_height,
            width: self.width() / image_width,
            height: self.height() / image_height,
        }
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}

/// One detector-training label, every coordinate a fraction of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLabel {
    pub class_id: u32,
    pub x_center: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
}

impl fmt::Display for NormalizedLabel {
    /// Label-file line: `<class_id> <x_center> <y_center> <width> <height>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// A box reported by the external eye detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    pub const fn new(bbox: BoundingBox, confidence: f32) -> Self {
        Self { bbox, confidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_set_requires_68_points() {
        let err = LandmarkSet::new(vec![Point::new(0.0, 0.0); 67]).unwrap_err();
        assert!(matches!(
            err,
            Error::LandmarkCount {
                expected: 68,
                found: 67
            }
        ));
        assert!(LandmarkSet::new(vec![Point::new(0.0, 0.0); 68]).is_ok());

        let err = LandmarkSet::new(vec![Point::new(0.0, 0.0); 69]).unwrap_err();
        assert!(matches!(
            err,
            Error::LandmarkCount {
                expected: 68,
                found: 69
            }
        ));
    }

    #[test]
    fn eye_regions_have_six_points() {
        let points = (0..68).map(|i| Point::new(i as f32, 0.0)).collect();
        let set = LandmarkSet::new(points).unwrap();

        assert_eq!(set.left_eye().len(), 6);
        assert_eq!(set.right_eye().len(), 6);
        assert_eq!(set.left_eye()[0].x, 36.0);
        assert_eq!(set.right_eye()[5].x, 47.0);
    }

    #[test]
    fn growing_box_over_points() {
        let bbox = BoundingBox::at(Point::new(12.0, 20.0))
            .including(Point::new(10.0, 15.0))
            .including(Point::new(30.0, 10.0));
        assert_eq!(bbox, BoundingBox::new(10.0, 10.0, 30.0, 20.0));

        // A point already inside leaves the box unchanged.
        assert_eq!(bbox.including(Point::new(20.0, 15.0)), bbox);
    }

    #[test]
    fn padding_grows_each_axis_by_sixty_percent() {
        let bbox = BoundingBox::new(10.0, 10.0, 30.0, 20.0).padded(0.3);
        assert!((bbox.width() - 32.0).abs() < 1e-4);
        assert!((bbox.height() - 16.0).abs() < 1e-4);
        assert!((bbox.x_min - 4.0).abs() < 1e-4);
        assert!((bbox.y_max - 23.0).abs() < 1e-4);
    }

    #[test]
    fn clamping_to_image() {
        let bbox = BoundingBox::new(-5.0, -1.0, 120.0, 30.0).clamped(100.0, 40.0);
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 100.0, 30.0));
    }

    #[test]
    fn clamping_box_past_far_edges() {
        // Partly beyond the right/bottom edges
        let bbox = BoundingBox::new(90.0, 30.0, 130.0, 55.0).clamped(100.0, 40.0);
        assert_eq!(bbox, BoundingBox::new(90.0, 30.0, 100.0, 40.0));

        // Entirely outside on both axes
        let bbox = BoundingBox::new(110.0, 45.0, 120.0, 60.0).clamped(100.0, 40.0);
        assert_eq!(bbox, BoundingBox::new(100.0, 40.0, 100.0, 40.0));
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);

        // Entirely before the origin
        let bbox = BoundingBox::new(-20.0, -9.0, -5.0, -1.0).clamped(100.0, 40.0);
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn label_line_format() {
        let label = BoundingBox::new(0.0, 0.0, 50.0, 20.0).normalize(100.0, 40.0);
        assert_eq!(label.to_string(), "0 0.25 0.25 0.5 0.5");
    }

    #[test]
    fn bbox_serializes_as_array() {
        let json = serde_json::to_string(&BoundingBox::new(1.0, 2.0, 3.5, 4.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.5,4.0]");

        let det: Detection =
            serde_json::from_str(r#"{"bbox":[0,0,10,5],"confidence":0.75}"#).unwrap();
        assert_eq!(det.bbox, BoundingBox::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(det.confidence, 0.75);
    }
}
