#![allow(dead_code)]

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use meter_reader::{DialColor, DialRegion, MeterConfig, RecognitionCandidate, Recognizer, Region};
use std::cell::RefCell;
use std::collections::VecDeque;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Recognizer that replays a fixed list of responses, one per call.
/// Once the script runs out every call recognizes nothing.
pub struct ScriptedRecognizer {
    responses: RefCell<VecDeque<Vec<RecognitionCandidate>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRecognizer {
    pub fn new(responses: Vec<Vec<RecognitionCandidate>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// One single-character candidate per entry, `None` for "nothing recognized"
    pub fn digits(texts: &[Option<&str>]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| match t {
                    Some(text) => vec![RecognitionCandidate::new(*text, 0.95)],
                    None => vec![],
                })
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Allowed character sets passed on each call
    pub fn allowed_sets(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Recognizer for ScriptedRecognizer {
    fn recognize(
        &self,
        _image: &RgbImage,
        allowed: &str,
    ) -> meter_reader::Result<Vec<RecognitionCandidate>> {
        self.calls.borrow_mut().push(allowed.to_string());
        Ok(self.responses.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// Recognizer that decodes a digit from the gray level at the crop center,
/// as painted by [`paint_digit`]. White means nothing recognized.
pub struct GrayCodeRecognizer;

impl Recognizer for GrayCodeRecognizer {
    fn recognize(
        &self,
        image: &RgbImage,
        _allowed: &str,
    ) -> meter_reader::Result<Vec<RecognitionCandidate>> {
        let level = image.get_pixel(image.width() / 2, image.height() / 2)[0];
        if level == 255 {
            return Ok(vec![]);
        }
        Ok(vec![RecognitionCandidate::new((level / 20).to_string(), 0.9)])
    }
}

/// Fill `region` with the gray level [`GrayCodeRecognizer`] reads as `digit`
pub fn paint_digit(img: &mut RgbImage, region: &Region, digit: u8) {
    let level = digit * 20 + 5;
    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            img.put_pixel(x, y, Rgb([level, level, level]));
        }
    }
}

/// Draw a needle from the region center at `degrees` clockwise from straight up
pub fn draw_needle(img: &mut RgbImage, region: &Region, degrees: f64, radius: f64, color: Rgb<u8>) {
    let (cx, cy) = region.local_center();
    let start = ((region.x + cx) as f32, (region.y + cy) as f32);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let end = (
        (start.0 as f64 + radius * sin).round() as f32,
        (start.1 as f64 - radius * cos).round() as f32,
    );
    draw_line_segment_mut(img, start, end, color);
    img.put_pixel(end.0 as u32, end.1 as u32, color);
}

pub fn white_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

pub fn dial(x: u32, y: u32, size: u32, color: DialColor) -> DialRegion {
    DialRegion {
        region: Region::new(x, y, size, size),
        color,
    }
}

/// Circular distance between two dial values in `[0, 10)`
pub fn dial_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(10.0);
    d.min(10.0 - d)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Layout used by the pipeline tests: 200x100 photo, 180x80 crop at (10, 10),
/// four digits in the top-left corner, two red dials on the right
pub const SAMPLE_CONFIG: &str = r#"{
    "image": { "rotate": 0, "crop": { "x": 10, "y": 10, "width": 180, "height": 80 } },
    "digits": [
        { "x": 0, "y": 0, "width": 20, "height": 30 },
        { "x": 20, "y": 0, "width": 20, "height": 30 },
        { "x": 40, "y": 0, "width": 20, "height": 30 },
        { "x": 60, "y": 0, "width": 20, "height": 30 }
    ],
    "decimal_digits": [],
    "decimal_analogs": [
        { "x": 90, "y": 35, "width": 41, "height": 41, "color": "red" },
        { "x": 135, "y": 35, "width": 41, "height": 41, "color": "red" }
    ],
    "postprocessing": {
        "digits": { "brightness": 0, "contrast": 0 },
        "analog": { "brightness": 0, "contrast": 0, "binaryThreshold": 100 }
    },
    "sanity": { "maxThreshold": 0.2 }
}"#;

pub fn sample_config() -> MeterConfig {
    MeterConfig::from_json(SAMPLE_CONFIG).expect("sample config parses")
}

/// Paint a photo matching [`SAMPLE_CONFIG`]: the given integer digits
/// (`None` leaves a region blank) and needles at the given angles
pub fn sample_photo(digits: &[Option<u8>], dial_angles: &[f64]) -> RgbImage {
    let config = sample_config();
    let crop = config.image.crop;
    let mut img = white_image(200, 100);

    for (region, digit) in config.digits.iter().zip(digits) {
        if let Some(d) = digit {
            paint_digit(&mut img, &offset(region, &crop), *d);
        }
    }
    for (dial, angle) in config.decimal_analogs.iter().zip(dial_angles) {
        draw_needle(&mut img, &offset(&dial.region, &crop), *angle, 18.0, RED);
    }
    img
}

/// Translate a crop-local region into photo coordinates
pub fn offset(region: &Region, crop: &Region) -> Region {
    Region::new(region.x + crop.x, region.y + crop.y, region.width, region.height)
}
