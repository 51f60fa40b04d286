//! Converts a directory of landmark-annotated face images into an eye
//! detection dataset.
//!
//! Output layout:
//!
//! ```text
//! <output>/
//!   dataset.yaml
//!   images/train/  images/val/
//!   labels/train/  labels/val/
//! ```
//!
//! Images are discovered recursively and sorted by path. The first
//! `floor(n * train_fraction)` positions in that order go to `train`, the rest
//! to `val`, so the split only depends on the set of file names.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::annotation::{find_annotation, load_landmarks};
use crate::error::{Error, Result};
use crate::labels::{eye_labels, format_labels};
use crate::types::EYE_CLASS_ID;

/// Name of the manifest written at the dataset root.
pub const MANIFEST_NAME: &str = "dataset.yaml";

/// Options for [`convert_dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    /// Fraction of discovered images placed in the training split.
    pub train_fraction: f64,
    /// Image extensions to pick up, compared case-insensitively.
    pub image_extensions: Vec<String>,
    /// Annotation extensions tried next to each image, in order.
    pub annotation_extensions: Vec<String>,
    pub label_extension: String,
    /// Remove an existing output directory before writing. Without it a
    /// non-empty output directory is refused, so splits from an earlier run
    /// can never mix with this one.
    pub clean_output: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
            image_extensions: vec!["jpg".to_string()],
            annotation_extensions: vec!["pts".to_string(), "txt".to_string()],
            label_extension: "txt".to_string(),
            clean_output: false,
        }
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.train_fraction) {
            return Err(Error::InvalidConfig(format!(
                "train fraction must be within [0, 1], got {}",
                self.train_fraction
            )));
        }
        if self.image_extensions.is_empty() {
            return Err(Error::InvalidConfig("no image extensions".to_string()));
        }
        if self.annotation_extensions.is_empty() {
            return Err(Error::InvalidConfig("no annotation extensions".to_string()));
        }
        if self.label_extension.is_empty() {
            return Err(Error::InvalidConfig("empty label extension".to_string()));
        }
        Ok(())
    }

    /// Number of leading images that go to the training split.
    pub fn train_count(&self, total: usize) -> usize {
        ((total as f64 * self.train_fraction).floor() as usize).min(total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub discovered: usize,
    pub processed: usize,
    pub skipped: usize,
    pub train: usize,
    pub val: usize,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "discovered {} images: {} processed ({} train, {} val), {} skipped",
            self.discovered, self.processed, self.train, self.val, self.skipped
        )
    }
}

#[derive(Debug, Serialize)]
struct Manifest {
    path: PathBuf,
    train: String,
    val: String,
    names: BTreeMap<u32, String>,
}

/// Recursively list images under `root` with an accepted extension, sorted by path.
pub fn discover_images<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            // Symlinked directories are not followed.
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else if has_extension(&path, extensions) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.as_ref().eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn images_dir(output: &Path, split: Split) -> PathBuf {
    output.join("images").join(split.as_str())
}

fn labels_dir(output: &Path, split: Split) -> PathBuf {
    output.join("labels").join(split.as_str())
}

/// Create the output directory tree.
///
/// An existing output directory must be empty unless `clean` is set, in
/// which case it is removed first.
pub fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if output.exists() {
        if clean {
            info!("removing existing output {}", output.display());
            fs::remove_dir_all(output)?;
        } else if fs::read_dir(output)?.next().is_some() {
            return Err(Error::OutputNotEmpty(output.to_path_buf()));
        }
    }
    for split in [Split::Train, Split::Val] {
        fs::create_dir_all(images_dir(output, split))?;
        fs::create_dir_all(labels_dir(output, split))?;
    }
    Ok(())
}

/// Convert one image and its annotation into `split`.
///
/// Either both the copied image and its label file exist afterwards, or
/// neither does.
pub fn convert_image(
    image_path: &Path,
    output: &Path,
    split: Split,
    config: &DatasetConfig,
) -> Result<()> {
    let annotation = find_annotation(image_path, &config.annotation_extensions)
        .ok_or_else(|| Error::MissingAnnotation(image_path.to_path_buf()))?;

    let image = image::open(image_path)?;
    let (width, height) = (image.width(), image.height());
    let landmarks = load_landmarks(&annotation)?;
    let contents = format_labels(&eye_labels(&landmarks, width, height));

    let file_name = image_path
        .file_name()
        .ok_or_else(|| Error::InvalidConfig(format!("not a file: {}", image_path.display())))?;
    let image_dest = images_dir(output, split).join(file_name);
    let label_dest = labels_dir(output, split)
        .join(Path::new(file_name).with_extension(&config.label_extension));

    fs::copy(image_path, &image_dest)?;
    if let Err(e) = fs::write(&label_dest, contents) {
        let _ = fs::remove_file(&image_dest);
        return Err(e.into());
    }

    debug!("{} -> {}", image_path.display(), label_dest.display());
    Ok(())
}

/// Write the dataset manifest for a converted output directory.
pub fn write_manifest(output: &Path) -> Result<PathBuf> {
    let manifest = Manifest {
        path: fs::canonicalize(output)?,
        train: format!("images/{}", Split::Train),
        val: format!("images/{}", Split::Val),
        names: BTreeMap::from([(EYE_CLASS_ID, "eye".to_string())]),
    };
    let path = output.join(MANIFEST_NAME);
    fs::write(&path, serde_yaml::to_string(&manifest)?)?;
    Ok(path)
}

/// Convert every annotated image under `source` into a dataset at `output`.
///
/// Images that have no annotation, cannot be decoded, or whose annotation is
/// malformed or does not hold 68 points are logged and counted as skipped.
/// Only directory-level failures abort the run.
pub fn convert_dataset(
    source: &Path,
    output: &Path,
    config: &DatasetConfig,
) -> Result<ConversionReport> {
    config.validate()?;
    prepare_output(output, config.clean_output)?;

    let images = discover_images(source, &config.image_extensions)?;
    let train_count = config.train_count(images.len());
    info!(
        "found {} images in {}, {} assigned to train",
        images.len(),
        source.display(),
        train_count
    );

    let mut report = ConversionReport {
        discovered: images.len(),
        ..Default::default()
    };

    for (i, image_path) in images.iter().enumerate() {
        let split = if i < train_count {
            Split::Train
        } else {
            Split::Val
        };

        match convert_image(image_path, output, split, config) {
            Ok(()) => {
                report.processed += 1;
                match split {
                    Split::Train => report.train += 1,
                    Split::Val => report.val += 1,
                }
            }
            Err(e) => {
                warn!("skipping {}: {}", image_path.display(), e);
                report.skipped += 1;
            }
        }
    }

    let manifest = write_manifest(output)?;
    info!("{report}; manifest at {}", manifest.display());
    Ok(report)
}
