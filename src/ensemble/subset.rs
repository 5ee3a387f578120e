//! Feature-subset models
//!
//! Each [`FeatureSubset`] is an independent KNN model restricted to a named
//! list of columns. Its accuracy on the machine split becomes its voting
//! weight.

use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::Dataset;
use crate::error::{CytologyError, Result};
use crate::training::KnnClassifier;

/// A named, ordered list of feature columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSubset {
    pub name: String,
    pub features: Vec<String>,
}

impl FeatureSubset {
    pub fn new(name: impl Into<String>, features: &[&str]) -> Self {
        Self {
            name: name.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Subset made of one column, named after it
    pub fn single(feature: &str) -> Self {
        Self::new(feature, &[feature])
    }
}

/// Fraction of `eval` rows predicted correctly by a KNN fitted on the
/// `subset` columns of `train`. Every evaluation row is a separate query.
pub fn evaluate_subset(subset: &FeatureSubset, train: &Dataset, eval: &Dataset, k: usize) -> Result<f64> {
    let (classifier, columns) = fit_subset(subset, train, k)?;
    subset_accuracy(&classifier, &columns, eval)
}

/// A feature subset bound to its fitted classifier and voting weight
#[derive(Debug, Clone)]
pub struct TrainedSubsetModel {
    subset: FeatureSubset,
    columns: Vec<usize>,
    classifier: KnnClassifier,
    accuracy: f64,
    weight: f64,
}

impl TrainedSubsetModel {
    /// Fit on `train`, score on `eval`, and weight by
    /// `accuracy * accuracy_multiplier`.
    pub fn train(
        subset: &FeatureSubset,
        train: &Dataset,
        eval: &Dataset,
        k: usize,
        accuracy_multiplier: f64,
    ) -> Result<Self> {
        let (classifier, columns) = fit_subset(subset, train, k)?;
        let accuracy = subset_accuracy(&classifier, &columns, eval)?;
        let weight = accuracy * accuracy_multiplier;

        debug!(subset = %subset.name, accuracy, weight, "Trained subset model");

        Ok(Self {
            subset: subset.clone(),
            columns,
            classifier,
            accuracy,
            weight,
        })
    }

    pub fn name(&self) -> &str {
        &self.subset.name
    }

    pub fn subset(&self) -> &FeatureSubset {
        &self.subset
    }

    /// Raw accuracy on the scoring split, in [0, 1]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Accuracy scaled by the configured multiplier
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Predict one full-width sample, using only this subset's columns
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<i64> {
        if let Some(&max) = self.columns.iter().max() {
            if max >= row.len() {
                return Err(CytologyError::ShapeError {
                    expected: format!("row with at least {} features", max + 1),
                    actual: format!("row with {} features", row.len()),
                });
            }
        }
        let query = row.select(Axis(0), &self.columns);
        self.classifier.predict_one(query.view())
    }
}

fn fit_subset(subset: &FeatureSubset, train: &Dataset, k: usize) -> Result<(KnnClassifier, Vec<usize>)> {
    if subset.features.is_empty() {
        return Err(CytologyError::ConfigError(format!(
            "feature subset '{}' has no columns",
            subset.name
        )));
    }

    let columns = train.column_indices(&subset.features)?;
    let mut classifier = KnnClassifier::with_k(k);
    classifier.fit(&train.select_columns(&columns), train.labels())?;
    Ok((classifier, columns))
}

fn subset_accuracy(classifier: &KnnClassifier, columns: &[usize], eval: &Dataset) -> Result<f64> {
    if eval.is_empty() {
        return Err(CytologyError::ValidationError(
            "cannot score a feature subset on an empty evaluation set".to_string(),
        ));
    }

    let x_eval = eval.select_columns(columns);
    let mut correct = 0usize;
    for (row, &truth) in x_eval.rows().into_iter().zip(eval.labels().iter()) {
        if classifier.predict_one(row)? == truth {
            correct += 1;
        }
    }

    Ok(correct as f64 / eval.n_samples() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names() -> Vec<String> {
        vec!["signal".to_string(), "noise".to_string()]
    }

    fn train_set() -> Dataset {
        // "signal" separates the classes, "noise" points the wrong way
        Dataset::new(
            names(),
            array![[1.0, 9.0], [1.2, 8.0], [0.8, 9.5], [9.0, 1.0], [9.3, 1.5], [8.7, 0.5]],
            array![0, 0, 0, 1, 1, 1],
        )
        .unwrap()
    }

    fn eval_set() -> Dataset {
        Dataset::new(
            names(),
            array![[1.1, 1.0], [0.9, 0.8], [9.1, 9.0], [8.9, 8.8]],
            array![0, 0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate_subset_accuracy() {
        let signal = FeatureSubset::single("signal");
        let noise = FeatureSubset::single("noise");

        let acc = evaluate_subset(&signal, &train_set(), &eval_set(), 1).unwrap();
        assert!((acc - 1.0).abs() < 1e-12);

        let acc = evaluate_subset(&noise, &train_set(), &eval_set(), 1).unwrap();
        assert!(acc.abs() < 1e-12);
    }

    #[test]
    fn test_trained_model_weight_uses_multiplier() {
        let subset = FeatureSubset::single("signal");
        let model = TrainedSubsetModel::train(&subset, &train_set(), &eval_set(), 3, 10.0).unwrap();

        assert_eq!(model.name(), "signal");
        assert!((model.accuracy() - 1.0).abs() < 1e-12);
        assert!((model.weight() - 10.0).abs() < 1e-12);
        assert_eq!(model.predict_row(array![9.5, 0.0].view()).unwrap(), 1);
    }

    #[test]
    fn test_unknown_feature() {
        let subset = FeatureSubset::new("bad", &["signal", "MCV"]);
        let err = evaluate_subset(&subset, &train_set(), &eval_set(), 1).unwrap_err();
        assert!(matches!(err, CytologyError::FeatureNotFound(name) if name == "MCV"));
    }

    #[test]
    fn test_empty_subset_and_empty_eval() {
        let empty = FeatureSubset::new("empty", &[]);
        assert!(evaluate_subset(&empty, &train_set(), &eval_set(), 1).is_err());

        let no_rows = eval_set().select_rows(&[]);
        let subset = FeatureSubset::single("signal");
        assert!(evaluate_subset(&subset, &train_set(), &no_rows, 1).is_err());
    }
}
