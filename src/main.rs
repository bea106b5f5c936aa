use clap::{Parser, Subcommand};
use image::ImageReader;
use std::path::{Path, PathBuf};
use tracing::info;

use textcrops::export::{self, DEFAULT_OUTPUT_DIR, OverlayStyle};
use textcrops::{RegionAnnotations, RegionList};

#[derive(Parser)]
#[command(name = "textcrops")]
#[command(about = "Export detected text regions as crops, overlays and coordinate files")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one masked crop per region
    Crop {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Region file (.json nested point arrays, otherwise coordinate lines)
        #[arg(long, value_name = "FILE")]
        regions: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Antialias region edges when masking
        #[arg(long)]
        smooth: bool,
    },

    /// Write the overlay image, heatmap and coordinate file
    Annotate {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Region file (.json nested point arrays, otherwise coordinate lines)
        #[arg(long, value_name = "FILE")]
        regions: PathBuf,

        /// Heatmap image produced by the detector
        #[arg(long, value_name = "FILE")]
        heatmap: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Text labels, one line per region (empty line for no label)
        #[arg(long, value_name = "FILE")]
        texts: Option<PathBuf>,

        /// TrueType font for labels (defaults to a system font)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,
    },

    /// Sort dataset files into images, masks and ground truth
    Classify {
        #[arg(value_name = "DIR")]
        root: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn load_image(path: &Path) -> anyhow::Result<image::DynamicImage> {
    ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image {}: {}", path.display(), e))
}

fn load_regions(path: &Path) -> anyhow::Result<RegionList> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(export::parse_coordinates(&content)?)
    }
}

fn load_texts(path: &Path) -> anyhow::Result<Vec<Option<String>>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| {
            let line = line.trim_end_matches('\r');
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Crop {
            image_path,
            regions,
            output,
            smooth,
        } => {
            let image = load_image(&image_path)?;
            let regions = load_regions(&regions)?;
            let crops = export::export_detected_regions(&image_path, &image, &regions, &output, smooth)?;
            println!("Wrote {} crops", crops.len());
        }
        Command::Annotate {
            image_path,
            regions,
            heatmap,
            output,
            texts,
            font,
        } => {
            let image = load_image(&image_path)?;
            let heatmap = load_image(&heatmap)?;
            let regions = load_regions(&regions)?;

            let mut annotations = RegionAnnotations::default();
            if let Some(texts) = texts {
                let mut labels = load_texts(&texts)?;
                // Trailing regions without a line get no label
                labels.resize(regions.len().max(labels.len()), None);
                annotations = annotations.with_texts(labels);
            }

            let style = match font {
                Some(font) => OverlayStyle::with_font_path(&font)?,
                None => OverlayStyle::with_system_font(),
            };

            let artifacts =
                export::save_results(&image_path, &image, &regions, &heatmap, &output, &annotations, &style)?;
            info!("Coordinates: {}", artifacts.coordinates.display());
            println!("Wrote {}", artifacts.overlay.display());
        }
        Command::Classify { root } => {
            let files = textcrops::list_files(&root);
            println!("Images:       {}", files.images.len());
            println!("Masks:        {}", files.masks.len());
            println!("Ground truth: {}", files.ground_truth.len());
            for path in files.images.iter().chain(&files.masks).chain(&files.ground_truth) {
                info!("{}", path.display());
            }
        }
    }

    Ok(())
}
