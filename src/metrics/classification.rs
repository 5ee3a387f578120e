//! Binary classification metrics

use serde::{Deserialize, Serialize};

use crate::error::{CytologyError, Result};

/// Metrics for a binary classifier, positive class 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    /// Fraction of exactly-correct predictions
    pub accuracy: f64,
    /// TP / (TP + FP), 0 when nothing was predicted positive
    pub precision: f64,
    /// TP / (TP + FN), 0 when there are no positives
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1_score: f64,
    /// Number of evaluated samples
    pub n_samples: usize,
}

/// Confusion matrix counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    pub fn from_labels(y_true: &[i64], y_pred: &[i64]) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let mut counts = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t == 1, p == 1) {
                (true, true) => counts.true_positive += 1,
                (false, true) => counts.false_positive += 1,
                (false, false) => counts.true_negative += 1,
                (true, false) => counts.false_negative += 1,
            }
        }
        Ok(counts)
    }
}

impl ClassificationMetrics {
    /// Compute metrics from true and predicted labels
    pub fn compute(y_true: &[i64], y_pred: &[i64]) -> Result<Self> {
        let counts = ConfusionCounts::from_labels(y_true, y_pred)?;

        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        let accuracy = correct as f64 / y_true.len() as f64;

        let tp = counts.true_positive as f64;
        let precision = ratio(tp, tp + counts.false_positive as f64);
        let recall = ratio(tp, tp + counts.false_negative as f64);
        let f1_score = ratio(2.0 * precision * recall, precision + recall);

        Ok(Self {
            accuracy,
            precision,
            recall,
            f1_score,
            n_samples: y_true.len(),
        })
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

pub(crate) fn check_lengths(n_true: usize, n_other: usize) -> Result<()> {
    if n_true != n_other {
        return Err(CytologyError::ValidationError(format!(
            "length mismatch: {n_true} true labels vs {n_other} predictions"
        )));
    }
    if n_true == 0 {
        return Err(CytologyError::ValidationError(
            "cannot compute metrics on zero samples".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_confusion_matrix() {
        // TP=2, FP=1, TN=2, FN=1
        let y_true = [1, 1, 1, 0, 0, 0];
        let y_pred = [1, 1, 0, 1, 0, 0];

        let counts = ConfusionCounts::from_labels(&y_true, &y_pred).unwrap();
        assert_eq!(counts.true_positive, 2);
        assert_eq!(counts.false_positive, 1);
        assert_eq!(counts.true_negative, 2);
        assert_eq!(counts.false_negative, 1);

        let m = ClassificationMetrics::compute(&y_true, &y_pred).unwrap();
        assert!((m.accuracy - 4.0 / 6.0).abs() < 1e-12);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.f1_score - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.n_samples, 6);
    }

    #[test]
    fn test_no_positive_predictions() {
        let m = ClassificationMetrics::compute(&[1, 0, 0], &[0, 0, 0]).unwrap();
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1_score, 0.0);
        assert!((m.accuracy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_predictions() {
        let m = ClassificationMetrics::compute(&[0, 1, 1], &[0, 1, 1]).unwrap();
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.f1_score, 1.0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(ClassificationMetrics::compute(&[1, 0], &[1]).is_err());
        assert!(ClassificationMetrics::compute(&[], &[]).is_err());
    }
}
