use crate::assemble::assemble;
use crate::config::MeterConfig;
use crate::detection::{preprocessing, DialReader, DigitReader, Recognizer};
use crate::error::{ReadError, Result};
use crate::models::Reading;
use crate::overlay::Overlay;
use crate::reconcile::reconcile;
use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where to write the debug overlay
#[derive(Clone, Debug)]
pub struct DebugConfig {
    pub output_path: PathBuf,
}

/// Recognition stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Digits,
    DecimalDigits,
    DecimalAnalogs,
}

impl Stage {
    pub fn name(&self) -> &str {
        match self {
            Stage::Digits => "digits",
            Stage::DecimalDigits => "decimal digits",
            Stage::DecimalAnalogs => "decimal analogs",
        }
    }
}

/// What one stage produced: a digit string, nothing configured, or an error
struct StageRecord {
    stage: Stage,
    outcome: Result<Option<String>>,
}

/// Result of a read together with the overlay, which exists even on failure
pub struct ReadOutcome {
    pub result: Result<Reading>,
    pub overlay: RgbImage,
}

/// Reads a meter photo with a fixed device layout.
///
/// Holds the recognizer for its whole lifetime; build it once and call
/// [`MeterReader::process`] for every capture.
pub struct MeterReader<R: Recognizer> {
    config: MeterConfig,
    recognizer: R,
    debug: Option<DebugConfig>,
}

impl<R: Recognizer> MeterReader<R> {
    pub fn new(config: MeterConfig, recognizer: R) -> Self {
        Self {
            config,
            recognizer,
            debug: None,
        }
    }

    /// Save the overlay to `output_path` on every [`MeterReader::process`] call.
    /// Creates the parent directory if needed.
    pub fn with_debug(mut self, output_path: PathBuf) -> Result<Self> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.debug = Some(DebugConfig { output_path });
        Ok(self)
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    /// Rotate the raw photo and cut out the region of interest
    pub fn prepare(&self, image: &RgbImage) -> RgbImage {
        let rotated = preprocessing::rotate_about_center(image, self.config.image.rotate);
        preprocessing::crop(&rotated, &self.config.image.crop)
    }

    /// Run every stage, build the overlay, then assemble the value.
    ///
    /// All configured regions are attempted even after a failure; the first
    /// captured error becomes the result.
    pub fn read(&self, image: &RgbImage, previous: Option<f64>) -> ReadOutcome {
        let working = self.prepare(image);
        let mut overlay = Overlay::new(&working);
        let postprocessing = &self.config.postprocessing;
        let digit_reader = DigitReader::new(&self.recognizer, postprocessing.digits);

        let mut records = Vec::with_capacity(3);

        let digits = digit_reader.read_digits(&working, &self.config.digits, &mut overlay);
        records.push(StageRecord {
            stage: Stage::Digits,
            outcome: digits,
        });

        let decimals =
            digit_reader.read_digits(&working, &self.config.decimal_digits, &mut overlay);
        let needs_analogs = !matches!(decimals, Ok(Some(_)));
        records.push(StageRecord {
            stage: Stage::DecimalDigits,
            outcome: decimals,
        });

        if needs_analogs {
            records.push(StageRecord {
                stage: Stage::DecimalAnalogs,
                outcome: self.read_analogs(&working, &mut overlay),
            });
        }

        ReadOutcome {
            result: finish(records, previous),
            overlay: overlay.into_image(),
        }
    }

    /// Read the meter and return its value, writing the overlay if debugging is on
    pub fn process(&self, image: &RgbImage, previous: Option<f64>) -> Result<f64> {
        let outcome = self.read(image, previous);

        if let Some(debug_config) = &self.debug {
            outcome.overlay.save(&debug_config.output_path)?;
            info!("Debug image saved to {}", debug_config.output_path.display());
        }

        let reading = outcome.result?;
        info!(
            "Read {} from {:?} + {:?}",
            reading.value, reading.integer_digits, reading.fractional_digits
        );
        Ok(reading.value)
    }

    /// Decode an image file and [`MeterReader::process`] it
    pub fn process_file(&self, path: &Path, previous: Option<f64>) -> Result<f64> {
        let image = load_image(path)?;
        self.process(&image, previous)
    }

    /// Read every dial, keeping the first error, then reconcile the values
    fn read_analogs(&self, working: &RgbImage, overlay: &mut Overlay) -> Result<Option<String>> {
        let dials = &self.config.decimal_analogs;
        if dials.is_empty() {
            return Ok(None);
        }

        let reader = DialReader::new(self.config.postprocessing.analog);
        let mut values = Vec::with_capacity(dials.len());
        let mut first_error = None;

        for dial in dials {
            match reader.read_dial(working, dial, overlay) {
                Ok(reading) => values.push(reading.value),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let digits = reconcile(&values);
        debug!("Dial values {:?} reconciled to {:?}", values, digits);
        Ok(Some(digits))
    }
}

/// Decode an image file into RGB
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let load_error = |reason: String| ReadError::ImageLoad {
        path: path.to_path_buf(),
        reason,
    };
    let image = ImageReader::open(path)
        .map_err(|e| load_error(e.to_string()))?
        .decode()
        .map_err(|e| load_error(e.to_string()))?;
    Ok(image.to_rgb8())
}

/// Raise the first stage error, or assemble the collected strings
fn finish(records: Vec<StageRecord>, previous: Option<f64>) -> Result<Reading> {
    let mut integer = None;
    let mut fraction = None;
    let mut first_error = None;

    for record in records {
        match record.outcome {
            Ok(Some(text)) if record.stage == Stage::Digits => integer = Some(text),
            Ok(Some(text)) => {
                fraction.get_or_insert(text);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Stage {} failed: {}", record.stage.name(), e);
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    let integer = integer.ok_or(ReadError::MissingDigits)?;
    assemble(&integer, fraction.as_deref(), previous)
}
