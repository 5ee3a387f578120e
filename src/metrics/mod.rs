//! Evaluation metrics
//!
//! Hard-label metrics (accuracy, precision, recall, F1) and the ROC curve of
//! the ensemble's continuous score.

mod classification;
mod roc;

pub use classification::{ClassificationMetrics, ConfusionCounts};
pub use roc::RocCurve;
