//! Eye-region labels derived from 68-point landmarks.
//!
//! Each eye's six contour points are boxed, the box is padded by
//! [`EYE_PADDING`] of its extent on every side, clamped to the image and
//! normalized to the image size. Left and right follow the landmark index
//! ranges ([`LEFT_EYE`](crate::LEFT_EYE), [`RIGHT_EYE`](crate::RIGHT_EYE)),
//! not any detection of which side an eye is on.

use crate::types::{BoundingBox, LandmarkSet, NormalizedLabel, Point, EYE_POINTS};

/// Fraction of the tight box extent added to each side, per axis.
pub const EYE_PADDING: f32 = 0.3;

/// Padded, clamped pixel box around one eye's contour points.
pub fn eye_box(points: &[Point; EYE_POINTS], image_width: u32, image_height: u32) -> BoundingBox {
    let [first, rest @ ..] = points;
    let tight = rest
        .iter()
        .fold(BoundingBox::at(*first), |b, p| b.including(*p));
    tight
        .padded(EYE_PADDING)
        .clamped(image_width as f32, image_height as f32)
}

/// Ground-truth labels for both eyes, left first.
pub fn eye_labels(
    landmarks: &LandmarkSet,
    image_width: u32,
    image_height: u32,
) -> [NormalizedLabel; 2] {
    let (w, h) = (image_width as f32, image_height as f32);
    [landmarks.left_eye(), landmarks.right_eye()]
        .map(|eye| eye_box(&eye, image_width, image_height).normalize(w, h))
}

/// Render labels as the contents of a label file, one line per label.
pub fn format_labels(labels: &[NormalizedLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
