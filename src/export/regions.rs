use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use tracing::info;

use crate::error::{ExportError, Result};
use crate::export::{ArtifactPaths, cropping};
use crate::models::{Region, validate_regions};

/// Write one masked crop per region to `<output_dir>/<name>_crops/crop_<i>.png`.
///
/// Files are numbered in region order. The crops directory is created even
/// when `regions` is empty. All regions are validated, including that each
/// crop overlaps the image, before anything is written; a failed write aborts
/// the call and leaves earlier crops in place.
pub fn export_detected_regions(
    image_path: &Path,
    image: &DynamicImage,
    regions: &[Region],
    output_dir: &Path,
    smooth_contour: bool,
) -> Result<Vec<PathBuf>> {
    validate_regions(regions)?;

    let (img_w, img_h) = image.dimensions();
    for (index, region) in regions.iter().enumerate() {
        let (_, _, width, height) = cropping::clamp_rect(region.bounding_rect(), img_w, img_h);
        if width == 0 || height == 0 {
            return Err(ExportError::DegenerateRegion {
                index,
                reason: "outside the image",
            });
        }
    }

    let paths = ArtifactPaths::for_image(image_path, output_dir);
    std::fs::create_dir_all(&paths.crops_dir).map_err(|e| ExportError::io(&paths.crops_dir, e))?;

    // private copy, dropped when the export returns
    let image = image.clone();

    let mut written = Vec::with_capacity(regions.len());
    for (i, region) in regions.iter().enumerate() {
        let file_path = paths.crop(i);
        cropping::export_detected_region(&image, region, &file_path, smooth_contour)?;
        written.push(file_path);
    }

    info!(
        crops = written.len(),
        dir = %paths.crops_dir.display(),
        "Exported region crops"
    );
    Ok(written)
}
