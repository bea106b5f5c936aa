use image::{GrayImage, Luma};
use imageproc::drawing::{draw_antialiased_polygon_mut, draw_polygon_mut};
use imageproc::pixelops::interpolate;
use imageproc::point::Point;

use crate::error::Result;
use crate::models::{BoundingRect, Region};

const MASK_ON: Luma<u8> = Luma([255u8]);

/// Rasterize `region` into a `width x height` mask.
///
/// Interior pixels are 255 and everything else 0. With `smooth_contour` the
/// edges are antialiased, so boundary pixels may hold partial coverage values.
pub fn region_mask(width: u32, height: u32, region: &Region, smooth_contour: bool) -> Result<GrayImage> {
    region.validate(0)?;

    let poly: Vec<Point<i32>> = region
        .open_points()
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();

    let mut mask = GrayImage::new(width, height);
    if smooth_contour {
        draw_antialiased_polygon_mut(&mut mask, &poly, MASK_ON, interpolate);
    } else {
        draw_polygon_mut(&mut mask, &poly, MASK_ON);
    }

    Ok(mask)
}

/// Mask plus the region's bounding rectangle, both in source image coordinates
pub fn mask_and_rect(
    width: u32,
    height: u32,
    region: &Region,
    smooth_contour: bool,
) -> Result<(GrayImage, BoundingRect)> {
    let mask = region_mask(width, height, region, smooth_contour)?;
    Ok((mask, region.bounding_rect()))
}
