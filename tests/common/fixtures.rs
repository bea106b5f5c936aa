#![allow(dead_code)]

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use textcrops::Region;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Solid white RGB image
pub fn white_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, WHITE))
}

/// RGB gradient so neighbouring pixels have distinct values
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128u8])
    });
    DynamicImage::ImageRgb8(img)
}

/// Saves `image` as PNG under `dir` and returns the path
pub fn save_source_image(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// The axis-aligned 40x30 rectangle at (10, 10)
pub fn rect_region() -> Region {
    Region::from_points([[10, 10], [50, 10], [50, 40], [10, 40]])
}

/// Quadrilateral with no axis-aligned edges
pub fn tilted_region() -> Region {
    Region::from_points([[10, 12], [70, 20], [60, 55], [15, 45]])
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .count()
}
