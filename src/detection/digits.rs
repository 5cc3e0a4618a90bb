use crate::config::EnhanceProfile;
use crate::detection::extract;
use crate::detection::ocr::{Recognizer, DIGIT_CHARSET};
use crate::error::{ReadError, Result};
use crate::models::{RecognitionCandidate, Region};
use crate::overlay::Overlay;
use image::RgbImage;
use tracing::{debug, warn};

/// Stands in for a last digit that could not be recognized; counts as 0
pub const PLACEHOLDER: char = '?';

/// Reads a row of single-digit windows through a recognizer
pub struct DigitReader<'a, R: Recognizer + ?Sized> {
    recognizer: &'a R,
    profile: EnhanceProfile,
}

impl<'a, R: Recognizer + ?Sized> DigitReader<'a, R> {
    pub fn new(recognizer: &'a R, profile: EnhanceProfile) -> Self {
        Self { recognizer, profile }
    }

    /// Read every region in order and concatenate the digits.
    ///
    /// Returns `None` when no regions are configured. A failed recognition
    /// on the last region yields [`PLACEHOLDER`]; on any other region the
    /// read fails with [`ReadError::OcrFailure`].
    pub fn read_digits(
        &self,
        image: &RgbImage,
        regions: &[Region],
        overlay: &mut Overlay,
    ) -> Result<Option<String>> {
        if regions.is_empty() {
            return Ok(None);
        }

        // Outline everything first so the overlay is complete even if we bail early
        for region in regions {
            overlay.outline(region);
        }

        let last = regions.len() - 1;
        let mut text = String::with_capacity(regions.len());

        for (i, region) in regions.iter().enumerate() {
            let crop = extract(image, region, &self.profile);
            let candidates = self.recognizer.recognize(&crop, DIGIT_CHARSET)?;

            match single_char(&candidates) {
                Ok(c) => {
                    debug!("Digit region {}: '{}'", i, c);
                    text.push(c);
                }
                Err(detail) if i == last => {
                    warn!("Last digit unreadable ({}), using placeholder", detail);
                    text.push(PLACEHOLDER);
                }
                Err(detail) => {
                    return Err(ReadError::OcrFailure { region: i, detail });
                }
            }
        }

        Ok(Some(text))
    }
}

/// Accept exactly one candidate whose text is exactly one character
fn single_char(candidates: &[RecognitionCandidate]) -> std::result::Result<char, String> {
    let [candidate] = candidates else {
        return Err(format!("expected 1 candidate, got {}", candidates.len()));
    };

    let mut chars = candidate.text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!(
            "expected a single character, got {:?} (confidence {:.2})",
            candidate.text, candidate.confidence
        )),
    }
}
