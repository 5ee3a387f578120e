//! In-memory labelled dataset

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CytologyError, Result};

/// Numeric feature matrix with one integer label per row.
///
/// Rows are samples; columns follow `feature_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Array2<f64>,
    labels: Array1<i64>,
}

impl Dataset {
    pub fn new(feature_names: Vec<String>, features: Array2<f64>, labels: Array1<i64>) -> Result<Self> {
        if features.ncols() != feature_names.len() {
            return Err(CytologyError::ShapeError {
                expected: format!("{} feature columns", feature_names.len()),
                actual: format!("{} feature columns", features.ncols()),
            });
        }
        if features.nrows() != labels.len() {
            return Err(CytologyError::ShapeError {
                expected: format!("{} labels", features.nrows()),
                actual: format!("{} labels", labels.len()),
            });
        }

        Ok(Self {
            feature_names,
            features,
            labels,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &Array1<i64> {
        &self.labels
    }

    /// Resolve column names to indices, preserving the requested order
    pub fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.feature_names
                    .iter()
                    .position(|f| f == name)
                    .ok_or_else(|| CytologyError::FeatureNotFound(name.to_string()))
            })
            .collect()
    }

    /// Feature matrix restricted to the given columns
    pub fn select_columns(&self, indices: &[usize]) -> Array2<f64> {
        self.features.select(Axis(1), indices)
    }

    /// New dataset holding only the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }

    /// Number of rows per label, sorted by label
    pub fn class_counts(&self) -> Vec<(i64, usize)> {
        let mut counts: Vec<(i64, usize)> = Vec::new();
        for &label in self.labels.iter() {
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, c)) => *c += 1,
                None => counts.push((label, 1)),
            }
        }
        counts.sort_by_key(|(label, _)| *label);
        counts
    }
}
