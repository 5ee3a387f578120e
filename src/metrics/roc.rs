//! ROC curve and area under it

use serde::{Deserialize, Deserializer, Serialize};

use super::classification::check_lengths;
use crate::error::{CytologyError, Result};

/// Receiver operating characteristic of a continuous score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    /// False-positive rate per threshold
    pub fpr: Vec<f64>,
    /// True-positive rate per threshold
    pub tpr: Vec<f64>,
    /// Score thresholds, descending; the first one is +inf, which JSON
    /// stores as null
    #[serde(deserialize_with = "thresholds_from_json")]
    pub thresholds: Vec<f64>,
    /// Trapezoidal area under the curve
    pub auc: f64,
}

impl RocCurve {
    /// Sweep the distinct scores from highest to lowest, predicting 1 for
    /// every sample scoring at or above the threshold.
    pub fn compute(y_true: &[i64], scores: &[f64]) -> Result<Self> {
        check_lengths(y_true.len(), scores.len())?;
        if scores.iter().any(|s| s.is_nan()) {
            return Err(CytologyError::ValidationError(
                "ROC scores must not be NaN".to_string(),
            ));
        }

        let n_pos = y_true.iter().filter(|&&y| y == 1).count();
        let n_neg = y_true.len() - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(CytologyError::ValidationError(format!(
                "ROC needs both classes, got {n_pos} positive and {n_neg} negative samples"
            )));
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut fpr = vec![0.0];
        let mut tpr = vec![0.0];
        let mut thresholds = vec![f64::INFINITY];

        let (mut tp, mut fp) = (0usize, 0usize);
        for (pos, &i) in order.iter().enumerate() {
            if y_true[i] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }

            // emit a point once all samples sharing this score are counted
            let last_of_group = order
                .get(pos + 1)
                .map_or(true, |&next| scores[next] != scores[i]);
            if last_of_group {
                fpr.push(fp as f64 / n_neg as f64);
                tpr.push(tp as f64 / n_pos as f64);
                thresholds.push(scores[i]);
            }
        }

        let auc = trapezoid(&fpr, &tpr);

        Ok(Self { fpr, tpr, thresholds, auc })
    }

    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }
}

fn thresholds_from_json<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|t| t.unwrap_or(f64::INFINITY)).collect())
}

fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}
