//! Feature-subset ensemble
//!
//! Several KNN models, one per [`FeatureSubset`], each weighted by its
//! accuracy on a scoring split, vote on every held-out sample through a
//! [`WeightedVoter`].

mod subset;
mod voting;

pub use subset::{evaluate_subset, FeatureSubset, TrainedSubsetModel};
pub use voting::{EnsembleDecision, VoteRecord, VoteTally, WeightedVoter};

use ndarray::ArrayView1;

use crate::error::Result;

/// Collect one [`VoteRecord`] per trained model for a full-width sample
pub fn collect_votes(models: &[TrainedSubsetModel], row: ArrayView1<f64>) -> Result<Vec<VoteRecord>> {
    models
        .iter()
        .map(|model| {
            model
                .predict_row(row)
                .map(|prediction| VoteRecord::new(model.name(), prediction, model.weight()))
        })
        .collect()
}
