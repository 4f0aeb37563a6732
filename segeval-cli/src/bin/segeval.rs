//! Segmentation evaluation
//!
//! Evaluates every model under a models directory against ground-truth masks.
//!
//! ## Usage
//!
//! ```bash
//! # Evaluate with the default layout (./Models and ./GT)
//! cargo run --bin segeval
//!
//! # Explicit directories, native resolution, recompute existing results
//! cargo run --bin segeval -- models/ gt/ --no-resize --overwrite
//!
//! # Load settings from a JSON file
//! cargo run --bin segeval -- --config run.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use segeval_cli::{Evaluator, RunConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory with all model predictions, one sub-directory per model
    models: Option<PathBuf>,

    /// Directory with ground-truth masks, one sub-directory per test dataset
    gt: Option<PathBuf>,

    /// Width and height to resize the images to
    #[arg(short, long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    resize: Option<Vec<u32>>,

    /// Evaluate at the original image resolution
    #[arg(long, conflicts_with = "resize")]
    no_resize: bool,

    /// Number of recall points curves are interpolated onto
    #[arg(long)]
    interp_points: Option<usize>,

    /// Training datasets to evaluate (separated by ',')
    #[arg(long, value_delimiter = ',')]
    train: Option<Vec<String>>,

    /// Test datasets to evaluate (separated by ',')
    #[arg(long, value_delimiter = ',')]
    test: Option<Vec<String>>,

    /// Overwrite existing results
    #[arg(short, long)]
    overwrite: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    // Apply command line overrides
    if let Some(models) = args.models {
        config.models_path = models;
    }
    if let Some(gt) = args.gt {
        config.gt_path = gt;
    }
    if let Some([width, height]) = args.resize.as_deref() {
        config.resize = Some([*width, *height]);
    }
    if args.no_resize {
        config.resize = None;
    }
    if let Some(points) = args.interp_points {
        config.evaluation.grid_points = points;
    }
    if let Some(train) = args.train {
        config.train_datasets = train;
    }
    if let Some(test) = args.test {
        config.test_datasets = test;
    }
    config.overwrite |= args.overwrite;

    tracing::info!(
        models = %config.models_path.display(),
        gt = %config.gt_path.display(),
        resize = ?config.resize,
        grid_points = config.evaluation.grid_points,
        overwrite = config.overwrite,
        "segmentation evaluation"
    );

    let evaluator = Evaluator::new(config)?;
    let written = evaluator.run()?;
    tracing::info!(reports = written.len(), "evaluation completed");
    Ok(())
}
