use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while reading a meter
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// A digit region other than the last one was not recognized as a single character
    #[error("OCR failed on digit region {region}: {detail}")]
    OcrFailure { region: usize, detail: String },

    #[error("color {color} not found in dial image or binaryThreshold too high")]
    ColorNotFound { color: &'static str },

    #[error("invalid dial angle, value {value} is outside [0, 10)")]
    InvalidAngle { value: f64 },

    #[error("invalid digit string {0:?}")]
    InvalidDigitString(String),

    #[error("no integer digits were read")]
    MissingDigits,

    #[error("recognition engine failed: {0}")]
    Recognition(String),

    #[error(
        "OCR models not found, expected:\n  - {}\n  - {}",
        detection.display(),
        recognition.display()
    )]
    ModelsNotFound {
        detection: PathBuf,
        recognition: PathBuf,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to save debug image: {0}")]
    DebugImage(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sanity check failed: {0}")]
    SanityCheck(String),
}

pub type Result<T> = std::result::Result<T, ReadError>;
