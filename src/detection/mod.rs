//! Seam to the text detector. The network itself lives outside this crate;
//! anything that turns an image into regions plus a heatmap can plug in here.

use image::DynamicImage;

use crate::models::RegionList;

/// Score thresholds handed to the detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionThresholds {
    /// Minimum character region score
    pub text_threshold: f32,
    /// Minimum affinity score between characters
    pub link_threshold: f32,
    /// Lower bound on text score when growing regions
    pub low_text: f32,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            text_threshold: 0.7,
            link_threshold: 0.4,
            low_text: 0.4,
        }
    }
}

/// Output of one detector run
#[derive(Debug, Clone)]
pub struct Detection {
    /// Quadrilateral boxes
    pub bboxes: RegionList,
    /// Polygons following the text outline. May be empty when the detector
    /// only produces boxes.
    pub polys: RegionList,
    /// Score visualization
    pub heatmap: DynamicImage,
}

impl Detection {
    /// Polygons when the detector produced any, boxes otherwise
    pub fn regions(&self) -> &RegionList {
        if self.polys.is_empty() {
            &self.bboxes
        } else {
            &self.polys
        }
    }
}

pub trait TextDetector {
    fn detect(&self, image: &DynamicImage, thresholds: &DetectionThresholds) -> anyhow::Result<Detection>;
}

impl<F> TextDetector for F
where
    F: Fn(&DynamicImage, &DetectionThresholds) -> anyhow::Result<Detection>,
{
    fn detect(&self, image: &DynamicImage, thresholds: &DetectionThresholds) -> anyhow::Result<Detection> {
        self(image, thresholds)
    }
}
