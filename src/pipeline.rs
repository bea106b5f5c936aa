use std::path::{Path, PathBuf};

use anyhow::Result;
use image::ImageReader;
use tracing::{debug, info};

use crate::detection::{DetectionThresholds, TextDetector};
use crate::export::{self, ExportOptions, OverlayStyle, ResultArtifacts};
use crate::models::RegionAnnotations;

/// What one pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub regions: usize,
    pub crops: Vec<PathBuf>,
    pub results: ResultArtifacts,
}

/// Detect text in an image and export crops plus annotated results.
///
/// ```no_run
/// # use textcrops::{ExportPipeline, Detection, DetectionThresholds};
/// # fn detector(_: &image::DynamicImage, _: &DetectionThresholds) -> anyhow::Result<Detection> { todo!() }
/// let output = ExportPipeline::new(detector)
///     .with_output_dir("output/")
///     .with_smooth_contour(true)
///     .run("figures/idcard.png")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct ExportPipeline<D> {
    detector: D,
    thresholds: DetectionThresholds,
    options: ExportOptions,
    style: OverlayStyle,
}

impl<D: TextDetector> ExportPipeline<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            thresholds: DetectionThresholds::default(),
            options: ExportOptions::new(),
            style: OverlayStyle::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: DetectionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_output_dir(output_dir);
        self
    }

    pub fn with_smooth_contour(mut self, smooth_contour: bool) -> Self {
        self.options = self.options.with_smooth_contour(smooth_contour);
        self
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Load `image_path`, run detection and write every artifact for it
    pub fn run(&self, image_path: impl AsRef<Path>) -> Result<PipelineOutput> {
        let image_path = image_path.as_ref();
        debug!("Loading image: {}", image_path.display());

        let image = ImageReader::open(image_path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

        let detection = self.detector.detect(&image, &self.thresholds)?;
        let regions = detection.regions();
        info!(
            bboxes = detection.bboxes.len(),
            polys = detection.polys.len(),
            "Detection finished"
        );

        let crops = export::export_detected_regions(
            image_path,
            &image,
            regions,
            &self.options.output_dir,
            self.options.smooth_contour,
        )?;

        let results = export::save_results(
            image_path,
            &image,
            regions,
            &detection.heatmap,
            &self.options.output_dir,
            &RegionAnnotations::default(),
            &self.style,
        )?;

        Ok(PipelineOutput {
            regions: regions.len(),
            crops,
            results,
        })
    }
}
