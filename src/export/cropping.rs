use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Pixel, Primitive};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::export::masking;
use crate::models::{BoundingRect, Region};

fn mask_buffer<P>(image: &ImageBuffer<P, Vec<P::Subpixel>>, mask: &GrayImage) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let mut masked = image.clone();
    for (x, y, pixel) in masked.enumerate_pixels_mut() {
        if mask.get_pixel(x, y)[0] == 0 {
            pixel.apply(|_| <P::Subpixel as Primitive>::DEFAULT_MIN_VALUE);
        }
    }
    masked
}

/// Zero every pixel whose mask value is 0, in all channels.
///
/// Works on a copy; `image` is untouched. Fails if the mask and image sizes differ.
pub fn apply_mask(image: &DynamicImage, mask: &GrayImage) -> Result<DynamicImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(ExportError::DimensionMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let masked = match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(mask_buffer(buf, mask)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(mask_buffer(buf, mask)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(mask_buffer(buf, mask)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(mask_buffer(buf, mask)),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(mask_buffer(buf, mask)),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(mask_buffer(buf, mask)),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(mask_buffer(buf, mask)),
        other => DynamicImage::ImageRgb8(mask_buffer(&other.to_rgb8(), mask)),
    };

    Ok(masked)
}

/// `rect` clamped to a `width x height` image, as `(x, y, width, height)`
pub fn clamp_rect(rect: BoundingRect, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let x0 = rect.x.clamp(0, width as i32) as u32;
    let y0 = rect.y.clamp(0, height as i32) as u32;
    let x1 = (rect.x as i64 + rect.width as i64).clamp(0, width as i64) as u32;
    let y1 = (rect.y as i64 + rect.height as i64).clamp(0, height as i64) as u32;

    (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
}

/// Slice `rect` out of `image`, clamped to the image bounds
pub fn crop_to_rect(image: &DynamicImage, rect: BoundingRect) -> DynamicImage {
    let (img_w, img_h) = image.dimensions();
    let (x, y, width, height) = clamp_rect(rect, img_w, img_h);
    image.crop_imm(x, y, width, height)
}

/// Mask `image` with `region` and cut out its bounding rectangle.
///
/// Pixels inside the polygon keep their values, the rest of the rectangle is black.
pub fn crop_region(image: &DynamicImage, region: &Region, smooth_contour: bool) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    let (mask, rect) = masking::mask_and_rect(width, height, region, smooth_contour)?;
    let masked = apply_mask(image, &mask)?;
    Ok(crop_to_rect(&masked, rect))
}

/// Crop one region and write it to `file_path`, replacing any existing file.
///
/// The encoder is picked from the file extension.
pub fn export_detected_region(
    image: &DynamicImage,
    region: &Region,
    file_path: &Path,
    smooth_contour: bool,
) -> Result<()> {
    let cropped = crop_region(image, region, smooth_contour)?;
    cropped
        .save(file_path)
        .map_err(|e| ExportError::image(file_path, e))?;

    debug!(
        path = %file_path.display(),
        width = cropped.width(),
        height = cropped.height(),
        "Saved region crop"
    );
    Ok(())
}
