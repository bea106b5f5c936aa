use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// A vertex in image pixel coordinates. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned rectangle in source image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// A closed polygon around one detected text area.
///
/// Points keep the detector's winding order. The polygon is implicitly closed,
/// so the last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region {
    pub points: Vec<Point>,
}

/// Regions for one source image. Order decides crop numbering, draw order and
/// coordinate file line order.
pub type RegionList = Vec<Region>;

impl Region {
    pub fn from_points(points: impl IntoIterator<Item = [i32; 2]>) -> Self {
        Self {
            points: points.into_iter().map(Point::from).collect(),
        }
    }

    /// Build from row-major `x0, y0, x1, y1, ...` coordinates
    pub fn from_flat(coords: &[i32]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(ExportError::InvalidCoordinates {
                message: format!("odd number of values ({})", coords.len()),
            });
        }
        Ok(Self::from_points(coords.chunks_exact(2).map(|c| [c[0], c[1]])))
    }

    /// Build from the batched `1 x K x 2` layout: exactly one polygon wrapped
    /// in an outer list.
    pub fn from_batched(batch: &[Vec<[i32; 2]>]) -> Result<Self> {
        match batch {
            [points] => Ok(Self::from_points(points.iter().copied())),
            _ => Err(ExportError::InvalidCoordinates {
                message: format!("expected a batch of 1 polygon, got {}", batch.len()),
            }),
        }
    }

    /// Build from detector float output. Values are truncated toward zero.
    pub fn from_f32_points(points: &[[f32; 2]]) -> Self {
        Self::from_points(points.iter().map(|&[x, y]| [x as i32, y as i32]))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Row-major `x0, y0, x1, y1, ...`
    pub fn flattened(&self) -> Vec<i32> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Smallest axis-aligned rectangle spanning the point extents.
    ///
    /// Width and height are `max - min`, so a region from 10 to 50 is 40 wide.
    pub fn bounding_rect(&self) -> BoundingRect {
        let Some(first) = self.points.first() else {
            return BoundingRect {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            };
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingRect {
            x: min_x,
            y: min_y,
            width: max_x.abs_diff(min_x),
            height: max_y.abs_diff(min_y),
        }
    }

    /// Check the region can be rasterized into a non-empty crop: at least 3
    /// distinct vertices and a bounding rectangle with area. `index` is only
    /// used for the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.points.len() < 3 {
            return Err(ExportError::MalformedRegion {
                index,
                points: self.points.len(),
            });
        }

        let distinct: HashSet<Point> = self.open_points().iter().copied().collect();
        if distinct.len() < 3 {
            return Err(ExportError::DegenerateRegion {
                index,
                reason: "fewer than 3 distinct vertices",
            });
        }

        let rect = self.bounding_rect();
        if rect.width == 0 || rect.height == 0 {
            return Err(ExportError::DegenerateRegion {
                index,
                reason: "zero width or height",
            });
        }
        Ok(())
    }

    /// Vertices for polygon fills: an explicit closing point equal to the
    /// first one is dropped.
    pub(crate) fn open_points(&self) -> &[Point] {
        let mut end = self.points.len();
        while end > 1 && self.points[end - 1] == self.points[0] {
            end -= 1;
        }
        &self.points[..end]
    }
}

pub(crate) fn validate_regions(regions: &[Region]) -> Result<()> {
    regions
        .iter()
        .enumerate()
        .try_for_each(|(i, region)| region.validate(i))
}

/// Optional per-region metadata, positionally matched to a [`RegionList`].
///
/// When present, each vector must be exactly as long as the region list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionAnnotations {
    /// Recognized text. `None` entries draw no label for that region.
    pub texts: Option<Vec<Option<String>>>,
    /// Accepted for compatibility, not used when rendering.
    pub verticals: Option<Vec<bool>>,
}

impl RegionAnnotations {
    pub fn with_texts(mut self, texts: Vec<Option<String>>) -> Self {
        self.texts = Some(texts);
        self
    }

    pub fn with_verticals(mut self, verticals: Vec<bool>) -> Self {
        self.verticals = Some(verticals);
        self
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.texts.as_ref()?.get(index)?.as_deref()
    }

    pub fn check_len(&self, regions: usize) -> Result<()> {
        if let Some(texts) = &self.texts {
            if texts.len() != regions {
                return Err(ExportError::AnnotationLengthMismatch {
                    what: "text labels",
                    expected: regions,
                    actual: texts.len(),
                });
            }
        }
        if let Some(verticals) = &self.verticals {
            if verticals.len() != regions {
                return Err(ExportError::AnnotationLengthMismatch {
                    what: "vertical flags",
                    expected: regions,
                    actual: verticals.len(),
                });
            }
        }
        Ok(())
    }
}
