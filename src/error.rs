use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Region {index} has {points} points, at least 3 are required")]
    MalformedRegion { index: usize, points: usize },

    #[error("Region {index} has no area ({reason})")]
    DegenerateRegion { index: usize, reason: &'static str },

    #[error("Mask is {mask:?} but image is {image:?} (width, height)")]
    DimensionMismatch { image: (u32, u32), mask: (u32, u32) },

    #[error("Got {actual} {what} for {expected} regions")]
    AnnotationLengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
