use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("Malformed annotation {path:?} at line {line}: {reason}")]
    MalformedAnnotation {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Expected {expected} landmarks, found {found}")]
    LandmarkCount { expected: usize, found: usize },

    #[error("No annotation file found for image {0:?}")]
    MissingAnnotation(PathBuf),

    #[error("Output directory {0:?} is not empty; clear it first")]
    OutputNotEmpty(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
