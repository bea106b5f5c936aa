use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Files found under a dataset root, bucketed by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFiles {
    pub images: Vec<PathBuf>,
    pub masks: Vec<PathBuf>,
    pub ground_truth: Vec<PathBuf>,
}

/// Role of a dataset file, decided by its extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Image,
    Mask,
    GroundTruth,
}

impl FileRole {
    /// Case-insensitive extension lookup. Archives and unknown extensions
    /// have no role.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "gif" | "png" | "pgm" => Some(Self::Image),
            "bmp" => Some(Self::Mask),
            "xml" | "gt" | "txt" => Some(Self::GroundTruth),
            // zip archives are skipped explicitly
            "zip" => None,
            _ => None,
        }
    }
}

/// Walk `root` recursively and bucket every file by role.
///
/// Paths are kept in walk order.
pub fn list_files(root: impl AsRef<Path>) -> DatasetFiles {
    let mut files = DatasetFiles::default();

    for entry in WalkDir::new(root.as_ref()).into_iter().filter_map(|e| e.ok()) {
        // follows symlinks, so linked files are listed too
        if !entry.path().is_file() {
            continue;
        }

        let path = entry.into_path();
        match FileRole::from_path(&path) {
            Some(FileRole::Image) => files.images.push(path),
            Some(FileRole::Mask) => files.masks.push(path),
            Some(FileRole::GroundTruth) => files.ground_truth.push(path),
            None => debug!("Skipping {}", path.display()),
        }
    }

    files
}
