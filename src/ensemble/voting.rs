//! Accuracy-weighted voting over feature-subset predictions

use serde::{Deserialize, Serialize};

use crate::error::{CytologyError, Result};

/// One subset's opinion about one held-out sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub subset: String,
    pub prediction: i64,
    pub weight: f64,
}

impl VoteRecord {
    pub fn new(subset: impl Into<String>, prediction: i64, weight: f64) -> Self {
        Self {
            subset: subset.into(),
            prediction,
            weight,
        }
    }
}

/// Vote mass accumulated for each class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub negative: f64,
    pub positive: f64,
}

impl VoteTally {
    pub fn total(&self) -> f64 {
        self.negative + self.positive
    }

    /// 1 only when the positive mass is strictly larger
    pub fn label(&self) -> i64 {
        if self.positive > self.negative { 1 } else { 0 }
    }

    /// Share of the mass cast for class 1; 0.5 when nothing was cast
    pub fn score(&self) -> f64 {
        let total = self.total();
        if total > 0.0 { self.positive / total } else { 0.5 }
    }
}

/// Final ensemble output for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleDecision {
    pub label: i64,
    pub score: f64,
    pub tally: VoteTally,
}

/// Soft-weighted majority vote.
///
/// Each record adds `weight.powf(exponent)` to the class it predicts;
/// records whose weight is below `min_weight` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedVoter {
    exponent: f64,
    min_weight: f64,
}

impl Default for WeightedVoter {
    fn default() -> Self {
        Self {
            exponent: 2.0,
            min_weight: 0.0,
        }
    }
}

impl WeightedVoter {
    pub fn new(exponent: f64, min_weight: f64) -> Result<Self> {
        // a zero weight raised to a negative power is +inf
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(CytologyError::InvalidParameter {
                name: "vote_exponent".to_string(),
                value: exponent.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
        if min_weight.is_nan() {
            return Err(CytologyError::InvalidParameter {
                name: "min_weight".to_string(),
                value: min_weight.to_string(),
                reason: "must be a number".to_string(),
            });
        }
        Ok(Self { exponent, min_weight })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Sum the vote mass per class. Predictions of 1 feed the positive
    /// class, every other prediction the negative one.
    pub fn tally(&self, records: &[VoteRecord]) -> VoteTally {
        let mut tally = VoteTally::default();
        for record in records.iter().filter(|r| r.weight >= self.min_weight) {
            let mass = record.weight.powf(self.exponent);
            if record.prediction == 1 {
                tally.positive += mass;
            } else {
                tally.negative += mass;
            }
        }
        tally
    }

    pub fn decide(&self, records: &[VoteRecord]) -> EnsembleDecision {
        let tally = self.tally(records);
        EnsembleDecision {
            label: tally.label(),
            score: tally.score(),
            tally,
        }
    }
}
