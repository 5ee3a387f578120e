//! cytology_knn - feature-subset KNN ensemble for cytology blood counts
//!
//! This crate loads a blood-count CSV, trains one brute-force KNN model per
//! named feature subset, weights each model by its accuracy on a scoring
//! split, and lets the models vote on held-out samples.
//!
//! # Modules
//!
//! - [`data`] - CSV loading, cleaning and randomized splits
//! - [`training`] - K-Nearest Neighbors classifier
//! - [`ensemble`] - Feature subsets and accuracy-weighted voting
//! - [`metrics`] - Accuracy, precision, recall, F1, ROC/AUC
//! - [`experiment`] - Configuration and the repetition loop
//! - [`export`] - ROC CSV and summary JSON output
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data and models
pub mod data;
pub mod training;
pub mod ensemble;
pub mod metrics;

// Orchestration
pub mod experiment;
pub mod export;

// Services
pub mod cli;

pub use error::{CytologyError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{CytologyError, Result};

    pub use crate::data::{DataConfig, DataLoader, Dataset, HoldoutSplit};
    pub use crate::training::{euclidean_distance, KnnClassifier, KnnConfig};
    pub use crate::ensemble::{
        evaluate_subset, EnsembleDecision, FeatureSubset, TrainedSubsetModel, VoteRecord, VoteTally,
        WeightedVoter,
    };
    pub use crate::metrics::{ClassificationMetrics, ConfusionCounts, RocCurve};
    pub use crate::experiment::{Experiment, ExperimentConfig, ExperimentSummary, RepetitionResult};
}
