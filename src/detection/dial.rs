use crate::config::AnalogProfile;
use crate::detection::{extract, preprocessing};
use crate::error::{ReadError, Result};
use crate::models::{DialReading, DialRegion};
use crate::overlay::Overlay;
use image::RgbImage;
use tracing::debug;

/// Degrees of needle sweep per digit
const DEGREES_PER_DIGIT: f64 = 36.0;

/// Converts an analog dial's needle position into a value in `[0, 10)`
pub struct DialReader {
    profile: AnalogProfile,
}

impl DialReader {
    pub fn new(profile: AnalogProfile) -> Self {
        Self { profile }
    }

    /// Locate the needle tip in `dial` and convert its angle to a value.
    /// Draws the region and the detected needle on `overlay`.
    pub fn read_dial(
        &self,
        image: &RgbImage,
        dial: &DialRegion,
        overlay: &mut Overlay,
    ) -> Result<DialReading> {
        let region = &dial.region;
        overlay.mark_dial(region);

        let crop = extract(image, region, &self.profile.enhance());
        let chroma = preprocessing::remove_gray_baseline(&crop);
        let target = preprocessing::channel(&chroma, dial.color.channel());
        let mask = preprocessing::binarize(&target, self.profile.binary_threshold);

        let center = region.local_center();
        let tip = furthest_match(&mask, center).ok_or(ReadError::ColorNotFound {
            color: dial.color.name(),
        })?;

        let value = needle_value(center, tip);
        overlay.needle(region, center, tip);
        debug!(
            "Dial at ({}, {}): tip {:?}, value {:.3}",
            region.x, region.y, tip, value
        );

        if !(0.0..10.0).contains(&value) {
            return Err(ReadError::InvalidAngle { value });
        }
        Ok(DialReading { value, tip })
    }
}

/// White pixel furthest from `center`; the first one in row-major order wins ties
fn furthest_match(mask: &image::GrayImage, center: (u32, u32)) -> Option<(u32, u32)> {
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    let mut best: Option<((u32, u32), i64)> = None;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] != 255 {
            continue;
        }
        let dx = x as i64 - cx;
        let dy = y as i64 - cy;
        let dist2 = dx * dx + dy * dy;
        if best.is_none_or(|(_, d)| dist2 > d) {
            best = Some(((x, y), dist2));
        }
    }

    best.map(|(tip, _)| tip)
}

/// Clockwise angle from straight up, scaled to `[0, 10)`
pub fn needle_value(center: (u32, u32), tip: (u32, u32)) -> f64 {
    let dx = tip.0 as f64 - center.0 as f64;
    // image rows grow downwards
    let dy = center.1 as f64 - tip.1 as f64;
    let angle = dx.atan2(dy).to_degrees().rem_euclid(360.0);
    angle / DEGREES_PER_DIGIT
}
