use crate::error::{ReadError, Result};
use crate::models::RecognitionCandidate;
use image::RgbImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Characters a digit window may contain
pub const DIGIT_CHARSET: &str = "0123456789";

/// ocrs does not report a per-line score
const OCRS_CONFIDENCE: f32 = 0.9;

/// Character recognition engine.
///
/// Given a small image, returns zero or more candidates whose text only uses
/// characters from `allowed`. An empty list means nothing was recognized.
pub trait Recognizer {
    fn recognize(&self, image: &RgbImage, allowed: &str) -> Result<Vec<RecognitionCandidate>>;
}

/// Recognizer backed by the ocrs engine
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    /// Load models from the standard cache location (`~/.cache/ocrs`)
    pub fn init() -> Result<Self> {
        Self::init_from_dir(&default_model_dir()?)
    }

    /// Load `text-detection.rten` and `text-recognition.rten` from `dir`.
    /// Model loading is expensive, call this once per process and reuse the value.
    pub fn init_from_dir(dir: &Path) -> Result<Self> {
        let detection_model_path = dir.join("text-detection.rten");
        let recognition_model_path = dir.join("text-recognition.rten");

        if !detection_model_path.exists() || !recognition_model_path.exists() {
            return Err(ReadError::ModelsNotFound {
                detection: detection_model_path,
                recognition: recognition_model_path,
            });
        }

        info!("Loading OCR models from {}", dir.display());
        let detection_model = Model::load_file(&detection_model_path)
            .map_err(|e| ReadError::Recognition(format!("detection model: {e}")))?;
        let recognition_model = Model::load_file(&recognition_model_path)
            .map_err(|e| ReadError::Recognition(format!("recognition model: {e}")))?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            allowed_chars: Some(DIGIT_CHARSET.to_string()),
            ..Default::default()
        })
        .map_err(|e| ReadError::Recognition(e.to_string()))?;

        Ok(Self { engine })
    }
}

impl Recognizer for OcrsRecognizer {
    fn recognize(&self, image: &RgbImage, allowed: &str) -> Result<Vec<RecognitionCandidate>> {
        let img_source = ImageSource::from_bytes(image.as_raw(), image.dimensions())
            .map_err(|e| ReadError::Recognition(e.to_string()))?;
        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| ReadError::Recognition(e.to_string()))?;
        let text = self
            .engine
            .get_text(&ocr_input)
            .map_err(|e| ReadError::Recognition(e.to_string()))?;

        let candidates = candidates_from_text(&text, allowed);

        debug!("ocrs returned {} candidate(s): {:?}", candidates.len(), candidates);
        Ok(candidates)
    }
}

/// Split recognized text into candidates: one per non-empty line, keeping
/// only characters from `allowed`
pub fn candidates_from_text(text: &str, allowed: &str) -> Vec<RecognitionCandidate> {
    text.lines()
        .map(|line| {
            line.chars()
                .filter(|c| allowed.contains(*c))
                .collect::<String>()
        })
        .filter(|line| !line.is_empty())
        .map(|line| RecognitionCandidate::new(line, OCRS_CONFIDENCE))
        .collect()
}

fn default_model_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ReadError::InvalidConfig("neither HOME nor USERPROFILE is set".into()))?;
    Ok(Path::new(&home_dir).join(".cache/ocrs"))
}
