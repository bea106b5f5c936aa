mod common;

use common::*;
use image::DynamicImage;
use textcrops::{Detection, DetectionThresholds, ExportPipeline};

fn fixed_detector(
    polys: RegionList,
) -> impl Fn(&DynamicImage, &DetectionThresholds) -> anyhow::Result<Detection> {
    move |image: &DynamicImage, _: &DetectionThresholds| {
        Ok(Detection {
            bboxes: vec![rect_region()],
            polys: polys.clone(),
            heatmap: DynamicImage::ImageRgb8(image.to_rgb8()),
        })
    }
}

#[test]
fn pipeline_writes_crops_and_results() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image_path = save_source_image(dir.path(), "scan.png", &gradient_image(80, 70));
    let out = dir.path().join("out");

    let output = ExportPipeline::new(fixed_detector(vec![tilted_region(), rect_region()]))
        .with_output_dir(&out)
        .with_smooth_contour(true)
        .run(&image_path)?;

    assert_eq!(output.regions, 2);
    assert_eq!(count_files(&out.join("scan_crops")), 2);
    assert!(output.results.overlay.is_file());
    assert!(output.results.heatmap.is_file());

    let coords = std::fs::read_to_string(&output.results.coordinates)?;
    assert_eq!(coords.lines().count(), 2);
    Ok(())
}

#[test]
fn pipeline_falls_back_to_boxes() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image_path = save_source_image(dir.path(), "boxes.png", &white_image(100, 100));

    let output = ExportPipeline::new(fixed_detector(Vec::new()))
        .with_output_dir(dir.path())
        .run(&image_path)?;

    assert_eq!(output.regions, 1);
    let coords = std::fs::read_to_string(&output.results.coordinates)?;
    assert_eq!(coords, "10,10,50,10,50,40,10,40\r\n");
    Ok(())
}

#[test]
fn missing_image_is_an_error() {
    let pipeline = ExportPipeline::new(fixed_detector(Vec::new()));
    assert!(pipeline.run("does/not/exist.png").is_err());
}
