use crate::config::EnhanceProfile;
use crate::models::Region;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};

/// Rotate counter-clockwise about the integer image center, keeping the size.
/// Samples outside the source repeat the nearest edge pixel.
pub fn rotate_about_center(img: &RgbImage, degrees: f64) -> RgbImage {
    if degrees == 0.0 {
        return img.clone();
    }

    let (width, height) = img.dimensions();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let (sin, cos) = degrees.to_radians().sin_cos();

    RgbImage::from_fn(width, height, |x, y| {
        // Inverse mapping: destination pixel back into the source
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;
        sample_replicate(img, sx, sy)
    })
}

/// Bicubic sample (a = -0.75). Taps outside the source repeat the nearest edge pixel.
fn sample_replicate(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let max_x = img.width() as i64 - 1;
    let max_y = img.height() as i64 - 1;
    let x0 = x.floor();
    let y0 = y.floor();
    let wx = cubic_weights(x - x0);
    let wy = cubic_weights(y - y0);

    let mut acc = [0.0f64; 3];
    for (j, wy) in wy.iter().enumerate() {
        let sy = (y0 as i64 - 1 + j as i64).clamp(0, max_y) as u32;
        for (i, wx) in wx.iter().enumerate() {
            let sx = (x0 as i64 - 1 + i as i64).clamp(0, max_x) as u32;
            let p = img.get_pixel(sx, sy);
            for c in 0..3 {
                acc[c] += p[c] as f64 * wx * wy;
            }
        }
    }
    Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

/// Keys cubic convolution weights for the four taps around offset `t` in `[0, 1)`
fn cubic_weights(t: f64) -> [f64; 4] {
    const A: f64 = -0.75;
    let w0 = ((A * (t + 1.0) - 5.0 * A) * (t + 1.0) + 8.0 * A) * (t + 1.0) - 4.0 * A;
    let w1 = ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0;
    let w2 = ((A + 2.0) * (1.0 - t) - (A + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    [w0, w1, w2, 1.0 - w0 - w1 - w2]
}

/// Crop a rectangle out of an image
pub fn crop(img: &RgbImage, region: &Region) -> RgbImage {
    region.extract(img)
}

/// Apply brightness then contrast, each by factor `1 + percent / 100`.
/// A zero percentage leaves the image untouched.
pub fn enhance(img: &RgbImage, profile: &EnhanceProfile) -> RgbImage {
    let mut out = img.clone();
    if profile.brightness != 0.0 {
        out = adjust_brightness(&out, 1.0 + profile.brightness / 100.0);
    }
    if profile.contrast != 0.0 {
        out = adjust_contrast(&out, 1.0 + profile.contrast / 100.0);
    }
    out
}

/// Scale every channel towards black (factor < 1) or brighter (factor > 1)
pub fn adjust_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for c in pixel.0.iter_mut() {
            *c = blend(0.0, *c as f32, factor);
        }
    }
    out
}

/// Move every channel away from (factor > 1) or towards (factor < 1) the mean gray level
pub fn adjust_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luma(img);
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for c in pixel.0.iter_mut() {
            *c = blend(mean, *c as f32, factor);
        }
    }
    out
}

/// Interpolate from `base` towards `value`, clamp, and truncate into a channel value
fn blend(base: f32, value: f32, factor: f32) -> u8 {
    (base + (value - base) * factor).clamp(0.0, 255.0) as u8
}

/// Per-pixel ITU-R 601 luma in 16-bit fixed point, rounded to a gray level
fn luma(p: &Rgb<u8>) -> u64 {
    (p[0] as u64 * 19595 + p[1] as u64 * 38470 + p[2] as u64 * 7471 + 0x8000) >> 16
}

/// Mean luma over the image, rounded to a whole gray level
fn mean_luma(img: &RgbImage) -> f32 {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = img
        .pixels()
        .map(luma)
        .sum();
    (sum as f64 / count as f64).round() as f32
}

/// Subtract each pixel's smallest channel from all of its channels.
/// Gray, white and black become black, only chromatic signal remains.
pub fn remove_gray_baseline(img: &RgbImage) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        let min = pixel.0.iter().copied().min().unwrap_or(0);
        for c in pixel.0.iter_mut() {
            *c -= min;
        }
    }
    out
}

/// Extract one channel as a grayscale image
pub fn channel(img: &RgbImage, index: usize) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        image::Luma([img.get_pixel(x, y)[index]])
    })
}

/// Binarize: values strictly above `level` become 255, the rest 0
pub fn binarize(img: &GrayImage, level: u8) -> GrayImage {
    threshold(img, level, ThresholdType::Binary)
}
