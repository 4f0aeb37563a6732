//! Configuration for batch evaluation runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use segeval::EvaluationConfig;
use serde::{Deserialize, Serialize};

/// Training datasets a model may have been trained on.
pub const TRAIN_DATASETS: [&str; 5] = ["All", "MASD+SBVPI", "MASD+SMD", "SBVPI", "SMD"];

/// Datasets predictions are evaluated on.
pub const TEST_DATASETS: [&str; 3] = ["MOBIUS", "SLD", "SMD"];

/// Configuration for one evaluation run.
///
/// Every model directory under `models_path` is evaluated on each
/// (train dataset, test dataset) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory with one sub-directory per model.
    pub models_path: PathBuf,
    /// Directory with one sub-directory of ground-truth masks per test dataset.
    pub gt_path: PathBuf,
    /// Training dataset names (second level of a model directory).
    pub train_datasets: Vec<String>,
    /// Test dataset names (third level of a model directory).
    pub test_datasets: Vec<String>,
    /// Width and height every image is resized to. None keeps the original size.
    pub resize: Option<[u32; 2]>,
    /// Recompute results that already exist on disk.
    pub overwrite: bool,
    /// Curve aggregation settings.
    pub evaluation: EvaluationConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            models_path: PathBuf::from("Models"),
            gt_path: PathBuf::from("GT"),
            train_datasets: TRAIN_DATASETS.map(String::from).to_vec(),
            test_datasets: TEST_DATASETS.map(String::from).to_vec(),
            resize: Some([480, 360]),
            overwrite: false,
            evaluation: EvaluationConfig::new(),
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Check the configuration before any file is touched.
    pub fn validate(&self) -> Result<()> {
        self.evaluation.validate()?;
        if self.train_datasets.is_empty() {
            anyhow::bail!("At least one training dataset is required");
        }
        if self.test_datasets.is_empty() {
            anyhow::bail!("At least one test dataset is required");
        }
        if let Some([width, height]) = self.resize {
            if width == 0 || height == 0 {
                anyhow::bail!("Resize dimensions must be positive, got {width}x{height}");
            }
        }
        Ok(())
    }
}
