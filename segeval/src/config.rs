//! Evaluation configuration and the shared recall grid.
//!
//! The only tunable that affects curve processing is the resolution of the
//! recall grid used for aggregation.

use burn::prelude::*;
use segeval_ops::linspace;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// Configuration for curve aggregation.
#[derive(Config, Debug)]
pub struct EvaluationConfig {
    /// Number of evenly spaced recall values in [0, 1] that curves are interpolated onto.
    #[config(default = "1000")]
    pub grid_points: usize,
}

impl EvaluationConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidConfiguration`] if the grid has fewer than two points.
    pub fn validate(&self) -> EvalResult<()> {
        if self.grid_points < 2 {
            return Err(EvalError::InvalidConfiguration {
                reason: format!(
                    "grid_points must be at least 2, got {}",
                    self.grid_points
                ),
            });
        }
        Ok(())
    }

    /// Materializes the recall grid this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn grid(&self) -> EvalResult<RecallGrid> {
        self.validate()?;
        RecallGrid::linspace(self.grid_points)
    }
}

/// Ordered recall values in [0, 1] shared by all curves during aggregation.
///
/// Historically called the threshold grid, but it is only ever used as a
/// recall axis; it does not bound probability thresholds.
#[doc(alias = "ThresholdGrid")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallGrid {
    points: Vec<f64>,
}

impl RecallGrid {
    /// `num` evenly spaced points over [0, 1], both endpoints included.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidConfiguration`] when `num < 2`.
    pub fn linspace(num: usize) -> EvalResult<Self> {
        let points = linspace(0.0, 1.0, num).map_err(|e| EvalError::InvalidConfiguration {
            reason: e.to_string(),
        })?;
        Ok(Self { points })
    }

    /// An explicit grid.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidConfiguration`] unless `points` is non-empty,
    /// strictly increasing and contained in [0, 1].
    pub fn from_points(points: Vec<f64>) -> EvalResult<Self> {
        if points.is_empty() {
            return Err(EvalError::InvalidConfiguration {
                reason: "recall grid must not be empty".to_owned(),
            });
        }
        if let Some(value) = points.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(EvalError::InvalidConfiguration {
                reason: format!("recall grid value {value} is outside [0, 1]"),
            });
        }
        segeval_ops::check_strictly_increasing(&points).map_err(|e| {
            EvalError::InvalidConfiguration {
                reason: format!("recall grid: {e}"),
            }
        })?;
        Ok(Self { points })
    }

    /// The grid values.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed grid; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn into_points(self) -> Vec<f64> {
        self.points
    }
}

/// How the aggregation grid is specified: a point count or an explicit grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridSpec {
    /// Evenly spaced grid with this many points over [0, 1].
    Points(usize),
    /// A grid given directly.
    Explicit(RecallGrid),
}

impl GridSpec {
    /// Resolves into a concrete grid.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidConfiguration`] for a point count below two.
    pub fn materialize(self) -> EvalResult<RecallGrid> {
        match self {
            Self::Points(num) => RecallGrid::linspace(num),
            Self::Explicit(grid) => Ok(grid),
        }
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::Points(1000)
    }
}

impl From<usize> for GridSpec {
    fn from(num: usize) -> Self {
        Self::Points(num)
    }
}

impl From<RecallGrid> for GridSpec {
    fn from(grid: RecallGrid) -> Self {
        Self::Explicit(grid)
    }
}

impl From<&EvaluationConfig> for GridSpec {
    fn from(config: &EvaluationConfig) -> Self {
        Self::Points(config.grid_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_thousand_point_grid() {
        let config = EvaluationConfig::new();
        assert_eq!(config.grid_points, 1000);

        let grid = config.grid().unwrap();
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.points()[0], 0.0);
        assert_eq!(grid.points()[999], 1.0);
    }

    #[test]
    fn config_rejects_degenerate_grid() {
        let config = EvaluationConfig::new().with_grid_points(1);
        match config.validate() {
            Err(EvalError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("grid_points must be at least 2"));
            }
            _ => panic!("Expected InvalidConfiguration error"),
        }
    }

    #[test]
    fn explicit_grid_is_validated() {
        assert!(RecallGrid::from_points(vec![0.0, 0.5, 1.0]).is_ok());
        assert!(RecallGrid::from_points(vec![]).is_err());
        assert!(RecallGrid::from_points(vec![0.0, 1.5]).is_err());
        assert!(RecallGrid::from_points(vec![0.0, 0.5, 0.5]).is_err());
    }

    #[test]
    fn grid_spec_conversions() {
        assert_eq!(GridSpec::from(3).materialize().unwrap().points(), &[0.0, 0.5, 1.0]);

        let grid = RecallGrid::from_points(vec![0.2, 0.4]).unwrap();
        assert_eq!(GridSpec::from(grid.clone()).materialize().unwrap(), grid);

        let config = EvaluationConfig::new().with_grid_points(11);
        assert_eq!(GridSpec::from(&config), GridSpec::Points(11));
    }
}
