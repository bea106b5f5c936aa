//! Annotated detection results: heatmap image, coordinate text file and an
//! overlay of every region on the source image.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::export::ArtifactPaths;
use crate::models::{Point, Region, RegionAnnotations, RegionList, validate_regions};

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

pub const TEXT_FILL_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

pub const TEXT_OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const DEFAULT_FONT_SCALE: f32 = 15.0;

const DEFAULT_OUTLINE_THICKNESS: i32 = 2;

const SYSTEM_FONT_PATHS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Drawing settings for the overlay image.
///
/// Colors are fixed; only the font and sizes are configurable. Without a font
/// the labels are skipped and only outlines are drawn.
pub struct OverlayStyle {
    pub font: Option<FontVec>,
    pub font_scale: f32,
    pub outline_thickness: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: DEFAULT_FONT_SCALE,
            outline_thickness: DEFAULT_OUTLINE_THICKNESS,
        }
    }
}

impl OverlayStyle {
    pub fn with_font_path(font_path: &Path) -> anyhow::Result<Self> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| anyhow::anyhow!("Failed to parse font file: {}", font_path.display()))?;

        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Try a few well-known system font locations, falling back to no font
    pub fn with_system_font() -> Self {
        for path in SYSTEM_FONT_PATHS {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(font_data)
            {
                debug!("Loaded system font: {}", path);
                return Self {
                    font: Some(font),
                    ..Self::default()
                };
            }
        }

        debug!("No system font found, text labels will be skipped");
        Self::default()
    }
}

impl std::fmt::Debug for OverlayStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStyle")
            .field("font", &self.font.is_some())
            .field("font_scale", &self.font_scale)
            .field("outline_thickness", &self.outline_thickness)
            .finish()
    }
}

/// Files written by [`save_results`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultArtifacts {
    pub coordinates: PathBuf,
    pub overlay: PathBuf,
    pub heatmap: PathBuf,
}

/// One line per region, `x0,y0,x1,y1,...` terminated by CRLF
pub fn format_coordinates(regions: &[Region]) -> String {
    let mut out = String::new();
    for region in regions {
        let line: Vec<String> = region.flattened().iter().map(i32::to_string).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Read a coordinate file back into regions. Blank lines are skipped and
/// both `\n` and `\r\n` endings are accepted.
pub fn parse_coordinates(text: &str) -> Result<RegionList> {
    let mut regions = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let coords = line
            .split(',')
            .map(|v| v.trim().parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ExportError::InvalidCoordinates {
                message: format!("line {}: {}", line_no + 1, e),
            })?;

        let region = Region::from_flat(&coords).map_err(|_| ExportError::InvalidCoordinates {
            message: format!("line {}: odd number of values", line_no + 1),
        })?;
        regions.push(region);
    }
    Ok(regions)
}

fn draw_closed_outline(canvas: &mut RgbImage, points: &[Point], thickness: i32) {
    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        let (x1, y1) = (start.x as f32, start.y as f32);
        let (x2, y2) = (end.x as f32, end.y as f32);

        for offset in 0..thickness.max(1) {
            let offset = offset as f32;
            draw_line_segment_mut(canvas, (x1 + offset, y1), (x2 + offset, y2), OUTLINE_COLOR);
            draw_line_segment_mut(canvas, (x1, y1 + offset), (x2, y2 + offset), OUTLINE_COLOR);
        }
    }
}

/// Draw `text` with its baseline starting at `(x, y)`
fn draw_label(canvas: &mut RgbImage, font: &FontVec, scale: PxScale, x: i32, y: i32, text: &str) {
    let ascent = font.as_scaled(scale).ascent().round() as i32;

    draw_text_mut(canvas, TEXT_OUTLINE_COLOR, x + 1, y + 1 - ascent, scale, font, text);
    draw_text_mut(canvas, TEXT_FILL_COLOR, x, y - ascent, scale, font, text);
}

/// Draw every region outline, and its label when one is given, onto a copy of `image`.
///
/// Regions are drawn in list order, so later regions end up on top.
pub fn render_overlay(
    image: &DynamicImage,
    regions: &[Region],
    annotations: &RegionAnnotations,
    style: &OverlayStyle,
) -> Result<RgbImage> {
    validate_regions(regions)?;
    annotations.check_len(regions.len())?;

    let mut canvas = image.to_rgb8();
    let scale = PxScale::from(style.font_scale);

    for (i, region) in regions.iter().enumerate() {
        draw_closed_outline(&mut canvas, &region.points, style.outline_thickness);

        let Some(text) = annotations.text(i) else {
            continue;
        };
        match &style.font {
            Some(font) => {
                let anchor = region.points[0];
                draw_label(&mut canvas, font, scale, anchor.x, anchor.y, text);
            }
            None => debug!(region = i, "No font loaded, skipping label"),
        }
    }

    Ok(canvas)
}

/// JPEG can't carry alpha or 16-bit samples
fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

/// Write the heatmap, the coordinate file and the overlay image for one source image.
///
/// Artifacts are written in that order and nothing is rolled back if a later
/// write fails.
pub fn save_results(
    image_path: &Path,
    image: &DynamicImage,
    regions: &[Region],
    heatmap: &DynamicImage,
    output_dir: &Path,
    annotations: &RegionAnnotations,
    style: &OverlayStyle,
) -> Result<ResultArtifacts> {
    validate_regions(regions)?;
    annotations.check_len(regions.len())?;

    let paths = ArtifactPaths::for_image(image_path, output_dir);
    std::fs::create_dir_all(output_dir).map_err(|e| ExportError::io(output_dir, e))?;

    jpeg_compatible(heatmap)
        .save(&paths.heatmap)
        .map_err(|e| ExportError::image(&paths.heatmap, e))?;

    std::fs::write(&paths.coordinates, format_coordinates(regions))
        .map_err(|e| ExportError::io(&paths.coordinates, e))?;

    let overlay = render_overlay(image, regions, annotations, style)?;
    overlay
        .save(&paths.overlay)
        .map_err(|e| ExportError::image(&paths.overlay, e))?;

    info!(
        regions = regions.len(),
        overlay = %paths.overlay.display(),
        "Saved detection results"
    );

    Ok(ResultArtifacts {
        coordinates: paths.coordinates,
        overlay: paths.overlay,
        heatmap: paths.heatmap,
    })
}
