//! Debug overlay showing every configured region and detected needle.

use crate::models::Region;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::Path;

const REGION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const NEEDLE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Canvas the readers draw on while they work
pub struct Overlay {
    canvas: RgbImage,
}

impl Overlay {
    /// Start from a copy of the working image
    pub fn new(working: &RgbImage) -> Self {
        Self {
            canvas: working.clone(),
        }
    }

    /// Outline a region with a one pixel frame
    pub fn outline(&mut self, region: &Region) {
        if region.is_empty() {
            return;
        }
        let rect = Rect::at(region.x as i32, region.y as i32).of_size(region.width, region.height);
        draw_hollow_rect_mut(&mut self.canvas, rect, REGION_COLOR);
    }

    /// Outline a dial region and cross it corner to corner
    pub fn mark_dial(&mut self, region: &Region) {
        if region.is_empty() {
            return;
        }
        self.outline(region);
        let left = region.x as f32;
        let top = region.y as f32;
        let right = (region.right() - 1) as f32;
        let bottom = (region.bottom() - 1) as f32;
        draw_line_segment_mut(&mut self.canvas, (left, top), (right, bottom), REGION_COLOR);
        draw_line_segment_mut(&mut self.canvas, (left, bottom), (right, top), REGION_COLOR);
    }

    /// Draw a three pixel wide line from the dial center to the needle tip.
    /// Both points are region-local.
    pub fn needle(&mut self, region: &Region, center: (u32, u32), tip: (u32, u32)) {
        let start = ((region.x + center.0) as f32, (region.y + center.1) as f32);
        let end = ((region.x + tip.0) as f32, (region.y + tip.1) as f32);
        for ox in -1..=1 {
            for oy in -1..=1 {
                let (ox, oy) = (ox as f32, oy as f32);
                draw_line_segment_mut(
                    &mut self.canvas,
                    (start.0 + ox, start.1 + oy),
                    (end.0 + ox, end.1 + oy),
                    NEEDLE_COLOR,
                );
            }
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbImage {
        self.canvas
    }

    /// Write the overlay as an image file, format picked from the extension
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        self.canvas.save(path)
    }
}
