mod common;

use common::*;
use image::GenericImageView;
use textcrops::{ExportError, export_detected_regions};

#[test]
fn crops_are_numbered_in_region_order() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = gradient_image(80, 70);
    let image_path = save_source_image(dir.path(), "sample.png", &image);
    let out = dir.path().join("out");

    let regions = vec![tilted_region(), rect_region()];
    let written = export_detected_regions(&image_path, &image, &regions, &out, false)?;

    let crops_dir = out.join("sample_crops");
    assert_eq!(written, vec![crops_dir.join("crop_0.png"), crops_dir.join("crop_1.png")]);
    assert_eq!(count_files(&crops_dir), 2);

    for (path, region) in written.iter().zip(&regions) {
        let rect = region.bounding_rect();
        let crop = image::open(path)?;
        assert_eq!(crop.dimensions(), (rect.width, rect.height));
    }
    Ok(())
}

#[test]
fn empty_region_list_creates_empty_crops_dir() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = white_image(20, 20);
    let image_path = dir.path().join("blank.jpg");

    let written = export_detected_regions(&image_path, &image, &[], dir.path(), false)?;

    let crops_dir = dir.path().join("blank_crops");
    assert!(written.is_empty());
    assert!(crops_dir.is_dir());
    assert_eq!(count_files(&crops_dir), 0);
    Ok(())
}

#[test]
fn repeated_runs_produce_identical_files() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = gradient_image(80, 70);
    let image_path = dir.path().join("repeat.png");
    let regions = vec![tilted_region(), rect_region()];

    let first = export_detected_regions(&image_path, &image, &regions, dir.path(), true)?;
    let first_bytes: Vec<Vec<u8>> = first.iter().map(std::fs::read).collect::<Result<_, _>>()?;

    let second = export_detected_regions(&image_path, &image, &regions, dir.path(), true)?;
    let second_bytes: Vec<Vec<u8>> = second.iter().map(std::fs::read).collect::<Result<_, _>>()?;

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    Ok(())
}

#[test]
fn existing_crop_is_overwritten() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let crops_dir = dir.path().join("page_crops");
    std::fs::create_dir_all(&crops_dir)?;
    std::fs::write(crops_dir.join("crop_0.png"), b"stale")?;

    let image = white_image(100, 100);
    export_detected_regions(&dir.path().join("page.png"), &image, &[rect_region()], dir.path(), false)?;

    let crop = image::open(crops_dir.join("crop_0.png"))?;
    assert_eq!(crop.dimensions(), (40, 30));
    Ok(())
}

#[test]
fn source_image_is_not_modified() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = gradient_image(80, 70);
    let before = image.clone();

    export_detected_regions(&dir.path().join("keep.png"), &image, &[tilted_region()], dir.path(), false)?;

    assert_eq!(image, before);
    Ok(())
}

#[test]
fn malformed_region_fails_before_writing() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = white_image(100, 100);
    let regions = vec![rect_region(), Region::from_points([[1, 1], [5, 5]])];

    let err = export_detected_regions(&dir.path().join("bad.png"), &image, &regions, dir.path(), false)
        .unwrap_err();

    assert!(matches!(err, ExportError::MalformedRegion { index: 1, points: 2 }));
    assert!(!dir.path().join("bad_crops").exists());
    Ok(())
}

#[test]
fn unwritable_output_fails() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    // A file where the output directory should be
    let blocker = dir.path().join("out");
    std::fs::write(&blocker, b"")?;

    let image = white_image(100, 100);
    let result = export_detected_regions(&dir.path().join("x.png"), &image, &[rect_region()], &blocker, false);

    assert!(matches!(result, Err(ExportError::Io { .. })));
    Ok(())
}

#[test]
fn collinear_region_fails_before_writing() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = white_image(100, 100);
    let regions = vec![rect_region(), Region::from_points([[10, 20], [50, 20], [30, 20]])];

    let err = export_detected_regions(&dir.path().join("flat.png"), &image, &regions, dir.path(), false)
        .unwrap_err();

    assert!(matches!(err, ExportError::DegenerateRegion { index: 1, .. }));
    assert!(!dir.path().join("flat_crops").exists());
    Ok(())
}

#[test]
fn repeated_point_region_fails_without_panicking() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = white_image(100, 100);
    let regions = vec![Region::from_points([[5, 5], [5, 5], [5, 5]])];

    let err = export_detected_regions(&dir.path().join("dot.png"), &image, &regions, dir.path(), true)
        .unwrap_err();

    assert!(matches!(err, ExportError::DegenerateRegion { index: 0, .. }));
    assert!(textcrops::export::crop_region(&image, &regions[0], false).is_err());
    assert!(!dir.path().join("dot_crops").exists());
    Ok(())
}

#[test]
fn region_outside_image_fails_before_writing() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = white_image(50, 50);
    let regions = vec![
        rect_region(),
        Region::from_points([[60, 60], [90, 60], [90, 80], [60, 80]]),
    ];

    let err = export_detected_regions(&dir.path().join("off.png"), &image, &regions, dir.path(), false)
        .unwrap_err();

    assert!(matches!(err, ExportError::DegenerateRegion { index: 1, .. }));
    assert!(!dir.path().join("off_crops").exists());
    Ok(())
}
