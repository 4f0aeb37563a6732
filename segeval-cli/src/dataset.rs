//! Ground-truth discovery and image loading.
//!
//! Ground truth for a test dataset lives under `<gt>/<test>/`, in any directory
//! structure. Predictions for a model mirror that structure under
//! `<model>/<train>/<test>/Predictions` and `<model>/<train>/<test>/Binarised`,
//! possibly with a different image extension.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};
use rayon::prelude::*;
use segeval::SampleArrays;
use walkdir::WalkDir;

/// Extensions tried, in order, when a prediction file is not found under the
/// ground-truth file name.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Luma value from which a mask pixel counts as foreground.
const MASK_THRESHOLD: u8 = 128;

/// One ground-truth mask.
#[derive(Debug, Clone)]
pub struct GroundTruthSample {
    /// Path relative to the dataset root, used to locate predictions.
    pub relative_path: PathBuf,
    /// Flattened binary mask.
    pub mask: Vec<bool>,
}

impl GroundTruthSample {
    /// Identifier used in reports.
    pub fn id(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// All ground-truth masks of one test dataset, loaded once and shared by
/// every model evaluated on it.
#[derive(Debug, Clone)]
pub struct GroundTruthSet {
    pub name: String,
    pub samples: Vec<GroundTruthSample>,
}

impl GroundTruthSet {
    /// Discovers and loads every mask under `root`.
    pub fn load(name: &str, root: &Path, resize: Option<[u32; 2]>) -> Result<Self> {
        let files = discover_images(root)?;
        tracing::info!(dataset = name, files = files.len(), "reading ground truth");

        let samples = files
            .par_iter()
            .map(|path| -> Result<_> {
                let mask = load_mask(path, resize)?;
                let relative_path = path
                    .strip_prefix(root)
                    .with_context(|| format!("{} is not under {}", path.display(), root.display()))?
                    .to_path_buf();
                Ok(GroundTruthSample {
                    relative_path,
                    mask,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_owned(),
            samples,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Image files under `root`, recursively, in a stable order.
pub fn discover_images(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to traverse directory: {}", root.display()))?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Finds `path`, or the same path with one of [`IMAGE_EXTENSIONS`].
pub fn resolve_image(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

fn open_image(path: &Path, resize: Option<[u32; 2]>) -> Result<DynamicImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image at {}", path.display()))?;
    Ok(match resize {
        Some([width, height]) => img.resize_exact(width, height, FilterType::CatmullRom),
        None => img,
    })
}

/// Loads a mask as foreground where luma is at least 128.
pub fn load_mask(path: &Path, resize: Option<[u32; 2]>) -> Result<Vec<bool>> {
    let luma = open_image(path, resize)?.into_luma8();
    Ok(luma.into_raw().into_iter().map(|v| v >= MASK_THRESHOLD).collect())
}

/// Loads a probabilistic prediction with luma scaled to [0, 1].
pub fn load_probabilities(path: &Path, resize: Option<[u32; 2]>) -> Result<Vec<f32>> {
    let luma = open_image(path, resize)?.into_luma8();
    Ok(luma
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect())
}

/// Where one model's outputs for a train/test configuration are stored.
#[derive(Debug, Clone)]
pub struct PredictionDirs {
    pub predictions: PathBuf,
    pub binarised: PathBuf,
}

impl PredictionDirs {
    pub fn new(model: &Path, train: &str, test: &str) -> Self {
        let root = model.join(train).join(test);
        Self {
            predictions: root.join("Predictions"),
            binarised: root.join("Binarised"),
        }
    }

    /// Fails unless both directories exist.
    pub fn check(&self) -> Result<()> {
        for dir in [&self.predictions, &self.binarised] {
            if !dir.is_dir() {
                anyhow::bail!("{} is not a directory", dir.display());
            }
        }
        Ok(())
    }

    /// Loads the prediction pair for `sample`.
    ///
    /// Returns `Ok(None)` with a warning when either file is missing, so one
    /// absent prediction does not abort the configuration.
    pub fn load_sample(
        &self,
        sample: &GroundTruthSample,
        resize: Option<[u32; 2]>,
    ) -> Result<Option<SampleArrays>> {
        let Some(prediction_path) = resolve_image(&self.predictions.join(&sample.relative_path))
        else {
            tracing::warn!(sample = %sample.id(), dir = %self.predictions.display(), "missing prediction file");
            return Ok(None);
        };
        let Some(binarised_path) = resolve_image(&self.binarised.join(&sample.relative_path))
        else {
            tracing::warn!(sample = %sample.id(), dir = %self.binarised.display(), "missing binarised file");
            return Ok(None);
        };

        let prediction = load_probabilities(&prediction_path, resize)?;
        let binarised = load_mask(&binarised_path, resize)?;
        let arrays = SampleArrays::new(prediction, binarised, sample.mask.clone())
            .with_context(|| format!("Invalid prediction for sample {}", sample.id()))?;
        Ok(Some(arrays))
    }
}
