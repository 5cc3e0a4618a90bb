pub mod dial;
pub mod digits;
pub mod ocr;
pub mod preprocessing;

use crate::config::EnhanceProfile;
use crate::models::Region;
use image::RgbImage;

pub use dial::DialReader;
pub use digits::{DigitReader, PLACEHOLDER};
pub use ocr::{OcrsRecognizer, Recognizer, DIGIT_CHARSET};

/// Cut `region` out of the working image and apply the enhancement profile.
/// The region must lie inside `image`.
pub fn extract(image: &RgbImage, region: &Region, profile: &EnhanceProfile) -> RgbImage {
    let crop = preprocessing::crop(image, region);
    preprocessing::enhance(&crop, profile)
}
