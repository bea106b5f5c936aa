//! Fetching remote resources such as model weights.
//!
//! Transports implement [`ResourceFetcher`]; [`download`] takes care of the
//! destination layout and progress reporting.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Progress hook called with `(blocks_done, block_size, total_size)`.
/// `total_size` is `None` while unknown.
pub type ProgressHook<'a> = &'a mut dyn FnMut(u64, u64, Option<u64>);

pub trait ResourceFetcher {
    /// Fetch `url` into the file at `destination`, reporting progress as it goes
    fn fetch_to(&self, url: &str, destination: &Path, progress: ProgressHook<'_>) -> Result<()>;
}

/// Last path segment of `url`, used as the local file name
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Download `url` into `save_dir`, keeping the URL's file name.
///
/// `save_dir` is created when missing. Returns the local path.
pub fn download(
    fetcher: &dyn ResourceFetcher,
    url: &str,
    save_dir: impl AsRef<Path>,
    progress: ProgressHook<'_>,
) -> Result<PathBuf> {
    let save_dir = save_dir.as_ref();
    let Some(name) = file_name_from_url(url) else {
        bail!("Cannot derive a file name from {url}");
    };

    std::fs::create_dir_all(save_dir)
        .with_context(|| format!("Failed to create {}", save_dir.display()))?;

    let destination = save_dir.join(name);
    fetcher.fetch_to(url, &destination, progress)?;

    info!("Downloaded {} to {}", url, destination.display());
    Ok(destination)
}

/// Turns absolute `(blocks, block_size, total)` reports into increments.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    label: String,
    position: u64,
    total: Option<u64>,
}

impl ProgressTracker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Record a report and return how many units were added since the last one
    pub fn update_to(&mut self, blocks: u64, block_size: u64, total: Option<u64>) -> u64 {
        if total.is_some() {
            self.total = total;
        }
        let new_position = blocks.saturating_mul(block_size);
        let delta = new_position.saturating_sub(self.position);
        self.position = new_position;

        match self.total {
            Some(total) => debug!("{}: {}/{} bytes", self.label, self.position, total),
            None => debug!("{}: {} bytes", self.label, self.position),
        }
        delta
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }
}

/// Fetcher for `file://` URLs and plain paths, copying in fixed-size blocks
#[derive(Debug, Clone)]
pub struct LocalFileFetcher {
    pub block_size: usize,
}

impl Default for LocalFileFetcher {
    fn default() -> Self {
        Self { block_size: 8192 }
    }
}

impl ResourceFetcher for LocalFileFetcher {
    fn fetch_to(&self, url: &str, destination: &Path, progress: ProgressHook<'_>) -> Result<()> {
        let source = Path::new(url.strip_prefix("file://").unwrap_or(url));
        let mut reader = File::open(source).with_context(|| format!("Failed to open {}", source.display()))?;
        let total = reader.metadata().ok().map(|m| m.len());
        let mut writer =
            File::create(destination).with_context(|| format!("Failed to create {}", destination.display()))?;

        let block_size = self.block_size.max(1);
        let mut buf = vec![0u8; block_size];
        let mut blocks = 0u64;
        progress(blocks, block_size as u64, total);

        loop {
            let read = reader.read(&mut buf)?;
            if read == 0 {
                break;
            }
            writer.write_all(&buf[..read])?;
            blocks += 1;
            progress(blocks, block_size as u64, total);
        }
        writer.flush()?;

        Ok(())
    }
}
