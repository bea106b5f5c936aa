pub mod dataset;
pub mod detection;
pub mod error;
pub mod export;
pub mod fetch;
pub mod models;
pub mod pipeline;

pub use dataset::{DatasetFiles, FileRole, list_files};
pub use detection::{Detection, DetectionThresholds, TextDetector};
pub use error::ExportError;
pub use export::{
    ArtifactPaths, ExportOptions, OverlayStyle, ResultArtifacts, export_detected_region, export_detected_regions,
    save_results,
};
pub use fetch::{LocalFileFetcher, ProgressTracker, ResourceFetcher, download};
pub use models::{BoundingRect, Point, Region, RegionAnnotations, RegionList};
pub use pipeline::{ExportPipeline, PipelineOutput};
