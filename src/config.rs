//! Per-device layout configuration.
//!
//! Loaded from a JSON document describing how to rotate and crop the photo
//! and where every digit and dial sits inside the cropped image.

use crate::error::{ReadError, Result};
use crate::models::{DialRegion, Region};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterConfig {
    pub image: ImageConfig,
    /// Integer digits, most significant first
    pub digits: Vec<Region>,
    /// Fractional digits read by OCR, most significant first
    #[serde(default)]
    pub decimal_digits: Vec<Region>,
    /// Fractional dials, used only when `decimal_digits` yields nothing
    #[serde(default)]
    pub decimal_analogs: Vec<DialRegion>,
    #[serde(default)]
    pub postprocessing: PostprocessingConfig,
    #[serde(default)]
    pub sanity: Option<SanityConfig>,
}

/// Rotation and region of interest applied to the raw photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Degrees, counter-clockwise about the image center
    #[serde(default)]
    pub rotate: f64,
    pub crop: Region,
}

/// Enhancement profiles, one per recognition kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostprocessingConfig {
    #[serde(default)]
    pub digits: EnhanceProfile,
    #[serde(default)]
    pub analog: AnalogProfile,
}

/// Brightness/contrast adjustment in signed percent, 0 means untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhanceProfile {
    #[serde(default)]
    pub brightness: f32,
    #[serde(default)]
    pub contrast: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalogProfile {
    #[serde(default)]
    pub brightness: f32,
    #[serde(default)]
    pub contrast: f32,
    #[serde(default = "default_binary_threshold")]
    pub binary_threshold: u8,
}

impl AnalogProfile {
    pub fn enhance(&self) -> EnhanceProfile {
        EnhanceProfile {
            brightness: self.brightness,
            contrast: self.contrast,
        }
    }
}

impl Default for AnalogProfile {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            binary_threshold: default_binary_threshold(),
        }
    }
}

fn default_binary_threshold() -> u8 {
    127
}

/// Plausibility limits used by the command line tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanityConfig {
    /// Largest accepted increase over the previous reading
    pub max_threshold: Option<f64>,
}

impl MeterConfig {
    /// Parse a configuration document without validating it
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the layout is usable against its own crop window
    pub fn validate(&self) -> Result<()> {
        let crop = &self.image.crop;
        if crop.is_empty() {
            return Err(ReadError::InvalidConfig("crop window has zero size".into()));
        }
        if self.digits.is_empty() {
            return Err(ReadError::InvalidConfig("no digit regions configured".into()));
        }

        let regions = self
            .digits
            .iter()
            .map(|r| ("digits", r))
            .chain(self.decimal_digits.iter().map(|r| ("decimal_digits", r)))
            .chain(self.decimal_analogs.iter().map(|a| ("decimal_analogs", &a.region)));

        for (section, region) in regions {
            if region.is_empty() {
                return Err(ReadError::InvalidConfig(format!(
                    "{section} region at ({}, {}) has zero size",
                    region.x, region.y
                )));
            }
            if !region.fits_within(crop.width, crop.height) {
                return Err(ReadError::InvalidConfig(format!(
                    "{section} region ({}, {}, {}x{}) exceeds crop window {}x{}",
                    region.x, region.y, region.width, region.height, crop.width, crop.height
                )));
            }
        }

        Ok(())
    }

    pub fn max_threshold(&self) -> Option<f64> {
        self.sanity.and_then(|s| s.max_threshold)
    }
}
