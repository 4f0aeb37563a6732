//! Reductions over curves and stacks of curves.

use crate::error::{OpsError, OpsResult};

/// Index of the maximum of `values`, breaking ties by first occurrence.
///
/// NaN entries never win. Returns `None` for an empty slice or one made
/// only of NaN.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Column-wise running mean and population standard deviation.
///
/// Rows are folded one at a time with Welford's update, so stacking `n`
/// identical rows reproduces the row exactly with zero deviation.
#[derive(Debug, Clone)]
pub struct ColumnMoments {
    count: usize,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl ColumnMoments {
    /// Creates empty moments over `width` columns.
    pub fn new(width: usize) -> Self {
        Self {
            count: 0,
            mean: vec![0.0; width],
            m2: vec![0.0; width],
        }
    }

    /// Folds one row into the running moments.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::LengthMismatch`] if the row width differs from the
    /// width the moments were created with.
    pub fn push(&mut self, row: &[f64]) -> OpsResult<()> {
        if row.len() != self.mean.len() {
            return Err(OpsError::LengthMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        self.count += 1;
        let n = self.count as f64;
        for ((mean, m2), &value) in self.mean.iter_mut().zip(self.m2.iter_mut()).zip(row) {
            let delta = value - *mean;
            *mean += delta / n;
            *m2 += delta * (value - *mean);
        }
        Ok(())
    }

    /// Number of rows folded so far.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Column means.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Column population standard deviations (`ddof = 0`).
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::EmptyInput`] if no row has been pushed.
    pub fn std(&self) -> OpsResult<Vec<f64>> {
        if self.count == 0 {
            return Err(OpsError::EmptyInput);
        }
        let n = self.count as f64;
        Ok(self.m2.iter().map(|m2| (m2 / n).max(0.0).sqrt()).collect())
    }
}
