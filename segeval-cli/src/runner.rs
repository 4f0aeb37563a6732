//! Evaluation of every model on every train/test configuration.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;
use segeval::{aggregate, evaluate, EvaluationSummary, GridSpec, RecallGrid, SampleEvaluation};

use crate::{
    config::RunConfig,
    dataset::{GroundTruthSet, PredictionDirs},
    report::EvaluationReport,
};

/// Runs a [`RunConfig`].
#[derive(Debug)]
pub struct Evaluator {
    config: RunConfig,
    grid: RecallGrid,
}

impl Evaluator {
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let grid = config.evaluation.grid()?;
        Ok(Self { config, grid })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Evaluates every model and returns the paths of the reports written.
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        let ground_truth = self.load_ground_truth()?;
        let models = list_models(&self.config.models_path)?;
        tracing::info!(models = models.len(), "evaluating models");

        let mut written = Vec::new();
        for model in &models {
            for train in &self.config.train_datasets {
                for (test, gt) in &ground_truth {
                    if let Some(path) = self.evaluate_configuration(model, train, test, gt)? {
                        written.push(path);
                    }
                }
            }
        }
        Ok(written)
    }

    fn load_ground_truth(&self) -> Result<BTreeMap<String, GroundTruthSet>> {
        let root = &self.config.gt_path;
        if !root.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }
        self.config
            .test_datasets
            .iter()
            .map(|name| -> Result<_> {
                let set = GroundTruthSet::load(name, &root.join(name), self.config.resize)?;
                Ok((name.clone(), set))
            })
            .collect()
    }

    /// Evaluates one model on one train/test pair and writes its report.
    ///
    /// Returns `None` when the report already exists and overwriting is off,
    /// or when no prediction could be found.
    pub fn evaluate_configuration(
        &self,
        model: &Path,
        train: &str,
        test: &str,
        ground_truth: &GroundTruthSet,
    ) -> Result<Option<PathBuf>> {
        let model_name = model
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = EvaluationReport::path(model, train, test);
        if !self.config.overwrite && output.is_file() {
            tracing::info!(path = %output.display(), "results exist, skipping");
            return Ok(None);
        }

        let dirs = PredictionDirs::new(model, train, test);
        dirs.check()?;
        tracing::info!(model = %model_name, train, test, "evaluating configuration");

        let resize = self.config.resize;
        let samples = ground_truth
            .samples
            .par_iter()
            .map(|sample| -> Result<_> {
                Ok(dirs
                    .load_sample(sample, resize)?
                    .map(|arrays| (sample.id(), arrays)))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        if samples.is_empty() {
            tracing::warn!(model = %model_name, train, test, "no predictions found");
            return Ok(None);
        }
        if samples.len() < ground_truth.len() {
            tracing::warn!(
                found = samples.len(),
                expected = ground_truth.len(),
                "evaluating with missing predictions"
            );
        }

        let evaluations = samples
            .par_iter()
            .map(|(id, arrays)| evaluate(arrays).with_context(|| format!("Failed to evaluate {id}")))
            .collect::<Result<Vec<SampleEvaluation>>>()?;

        let mut summary = EvaluationSummary::new();
        let mut curves = Vec::with_capacity(evaluations.len());
        for ((id, _), evaluation) in samples.iter().zip(evaluations) {
            summary.push(id.as_str(), &evaluation.probabilistic, &evaluation.binarized);
            curves.push(evaluation.curve);
        }
        let aggregate = aggregate(&curves, GridSpec::Explicit(self.grid.clone()))
            .with_context(|| format!("Failed to aggregate curves of {model_name} on {train}/{test}"))?;
        if let Some(point) = aggregate.mean.f1_point() {
            tracing::info!(
                model = %model_name,
                train,
                test,
                recall = point.recall,
                precision = point.precision,
                f1 = point.f1(),
                "best mean F1"
            );
        }

        let report = EvaluationReport {
            model: model_name,
            train: train.to_owned(),
            test: test.to_owned(),
            summary,
            curves,
            aggregate,
        };
        report.save(&output)?;
        Ok(Some(output))
    }
}

/// Model directories under `root`, sorted by name.
pub fn list_models(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }
    let mut models = Vec::new();
    for entry in
        fs::read_dir(root).with_context(|| format!("Failed to read directory: {}", root.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            models.push(path);
        }
    }
    models.sort();
    Ok(models)
}
