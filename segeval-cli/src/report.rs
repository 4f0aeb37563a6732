//! JSON persistence of evaluation results.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use segeval::{AggregateCurves, Curve, EvaluationSummary};
use serde::{Deserialize, Serialize};

/// Results of one model on one train/test configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model: String,
    pub train: String,
    pub test: String,
    /// Sample identifiers and per-sample metric values of both modalities.
    pub summary: EvaluationSummary,
    /// One precision-recall curve per sample, aligned with `summary.samples`.
    pub curves: Vec<Curve>,
    /// Mean curve and its standard-deviation band.
    pub aggregate: AggregateCurves,
}

impl EvaluationReport {
    /// `<model>/Results/<train>_<test>.json`.
    pub fn path(model: &Path, train: &str, test: &str) -> PathBuf {
        model.join("Results").join(format!("{train}_{test}.json"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string(self).context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved results");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse report: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use segeval::{aggregate, evaluate, SampleArrays};

    use super::*;

    #[test]
    fn report_survives_disk() {
        let sample = SampleArrays::new(
            vec![0.9, 0.8, 0.1, 0.2],
            vec![true, true, false, false],
            vec![true, true, false, true],
        )
        .unwrap();
        let evaluation = evaluate(&sample).unwrap();
        let mut summary = EvaluationSummary::new();
        summary.push("img.png", &evaluation.probabilistic, &evaluation.binarized);
        let report = EvaluationReport {
            model: "unet".to_owned(),
            train: "All".to_owned(),
            test: "SLD".to_owned(),
            aggregate: aggregate(std::slice::from_ref(&evaluation.curve), 11).unwrap(),
            curves: vec![evaluation.curve],
            summary,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = EvaluationReport::path(&dir.path().join("unet"), "All", "SLD");
        assert!(path.ends_with("unet/Results/All_SLD.json"));
        report.save(&path).unwrap();

        let loaded = EvaluationReport::load(&path).unwrap();
        assert_eq!(loaded.summary.samples, ["img.png"]);
        assert_eq!(loaded.curves.len(), 1);
        assert_eq!(loaded.aggregate.mean.len(), 11);
        assert_eq!(
            loaded.aggregate.mean.f1_point().is_some(),
            report.aggregate.mean.f1_point().is_some()
        );
    }
}
