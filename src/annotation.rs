//! Reader for `.pts` landmark annotations.
//!
//! The format is line based. Any header lines (`version: 1`, `n_points: 68`)
//! precede a body delimited by lines holding only `{` and `}`; each body line
//! carries an `x y` pair:
//!
//! ```text
//! version: 1
//! n_points: 68
//! {
//! 212.7 345.1
//! ...
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{LandmarkSet, Point};

/// Parse the body of a `.pts` file into raw points.
///
/// Header lines and body lines with fewer than two tokens are ignored. A file
/// without a `{` line yields no points. `path` is only used for error context.
pub fn parse_points(contents: &str, path: &Path) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    let mut in_body = false;

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line == "{" {
            in_body = true;
            continue;
        }
        if line == "}" {
            break;
        }
        if !in_body {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
            continue;
        };
        let malformed = |reason: String| Error::MalformedAnnotation {
            path: path.to_path_buf(),
            line: idx + 1,
            reason,
        };
        let x: f32 = x
            .parse()
            .map_err(|e| malformed(format!("bad x coordinate {x:?}: {e}")))?;
        let y: f32 = y
            .parse()
            .map_err(|e| malformed(format!("bad y coordinate {y:?}: {e}")))?;
        points.push(Point::new(x, y));
    }

    Ok(points)
}

/// Read and validate a 68-point annotation file.
pub fn load_landmarks<P: AsRef<Path>>(path: P) -> Result<LandmarkSet> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let points = parse_points(&contents, path)?;
    LandmarkSet::new(points)
}

/// Locate the annotation that belongs to `image_path`.
///
/// Tries each extension in order next to the image (`face.jpg` -> `face.pts`,
/// then `face.txt`) and returns the first existing file.
pub fn find_annotation<S: AsRef<str>>(image_path: &Path, extensions: &[S]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| image_path.with_extension(ext.as_ref()))
        .find(|candidate| candidate.is_file())
}
