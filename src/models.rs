use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Pixel rectangle inside the rotated and cropped working image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge, saturating at `u32::MAX`
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies completely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }

    /// Center in region-local coordinates, rounded down like integer division
    pub fn local_center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Copy the region out of `img` as a standalone image
    pub fn extract(&self, img: &RgbImage) -> RgbImage {
        image::imageops::crop_imm(img, self.x, self.y, self.width, self.height).to_image()
    }
}

/// Indicator color of an analog dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialColor {
    Red,
    Green,
    Blue,
}

impl DialColor {
    /// Channel index in an RGB pixel
    pub fn channel(self) -> usize {
        match self {
            DialColor::Red => 0,
            DialColor::Green => 1,
            DialColor::Blue => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DialColor::Red => "red",
            DialColor::Green => "green",
            DialColor::Blue => "blue",
        }
    }
}

/// Region holding one analog dial, plus the color of its needle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialRegion {
    #[serde(flatten)]
    pub region: Region,
    pub color: DialColor,
}

/// One result reported by the recognition engine for a crop
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionCandidate {
    pub text: String,
    pub confidence: f32,
}

impl RecognitionCandidate {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Raw value of one dial in `[0, 10)`, with the needle tip that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialReading {
    pub value: f64,
    /// Needle tip in region-local pixel coordinates
    pub tip: (u32, u32),
}

/// Final meter reading and the strings it was assembled from
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub integer_digits: String,
    pub fractional_digits: Option<String>,
    pub value: f64,
}
