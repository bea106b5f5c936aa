//! Region export: crops, overlay image, heatmap and coordinate file.
//!
//! Every file for one source image is named after the image's base filename
//! with the extension stripped:
//!
//! ```text
//! <output>/result_<name>.txt          coordinates, one region per line
//! <output>/result_<name>.jpg          source image with polygons drawn on top
//! <output>/result_<name>_heatmap.jpg  detector heatmap
//! <output>/<name>_crops/crop_<i>.png  one masked crop per region
//! ```

pub mod annotate;
pub mod cropping;
pub mod masking;
pub mod regions;

use std::path::{Path, PathBuf};

pub use annotate::{OverlayStyle, ResultArtifacts, format_coordinates, parse_coordinates, render_overlay, save_results};
pub use cropping::{apply_mask, crop_region, crop_to_rect, export_detected_region};
pub use masking::{mask_and_rect, region_mask};
pub use regions::export_detected_regions;

/// Default output root
pub const DEFAULT_OUTPUT_DIR: &str = "output/";

/// Options shared by the export entry points
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub smooth_contour: bool,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            smooth_contour: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Use antialiased polygon fills for crop masks
    pub fn with_smooth_contour(mut self, smooth_contour: bool) -> Self {
        self.smooth_contour = smooth_contour;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Base filename of `image_path` with the extension stripped
pub fn image_stem(image_path: &Path) -> String {
    image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Paths of every artifact produced for one source image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub coordinates: PathBuf,
    pub overlay: PathBuf,
    pub heatmap: PathBuf,
    pub crops_dir: PathBuf,
}

impl ArtifactPaths {
    pub fn for_image(image_path: &Path, output_dir: &Path) -> Self {
        let name = image_stem(image_path);
        Self {
            coordinates: output_dir.join(format!("result_{name}.txt")),
            overlay: output_dir.join(format!("result_{name}.jpg")),
            heatmap: output_dir.join(format!("result_{name}_heatmap.jpg")),
            crops_dir: output_dir.join(format!("{name}_crops")),
        }
    }

    pub fn crop(&self, index: usize) -> PathBuf {
        self.crops_dir.join(format!("crop_{index}.png"))
    }
}
