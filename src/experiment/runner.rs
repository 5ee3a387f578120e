//! Repetition loop: split, train subset models, vote, score

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::ExperimentConfig;
use crate::data::{Dataset, HoldoutSplit};
use crate::ensemble::{collect_votes, TrainedSubsetModel, WeightedVoter};
use crate::error::Result;
use crate::metrics::{ClassificationMetrics, RocCurve};

/// Accuracy and weight a subset earned in one repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetScore {
    pub name: String,
    pub accuracy: f64,
    pub weight: f64,
}

/// Outcome of one randomized split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionResult {
    pub index: usize,
    pub n_train: usize,
    pub subset_scores: Vec<SubsetScore>,
    pub y_true: Vec<i64>,
    pub y_pred: Vec<i64>,
    /// Share of vote mass cast for class 1, per hand sample
    pub scores: Vec<f64>,
    pub metrics: ClassificationMetrics,
    /// Absent when the hand split holds a single class
    pub roc: Option<RocCurve>,
}

/// Running best / mean of a per-repetition score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreAccumulator {
    values: Vec<f64>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn best(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }
}

/// Results of all repetitions plus aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub n_samples: usize,
    pub n_features: usize,
    pub config: ExperimentConfig,
    pub repetitions: Vec<RepetitionResult>,
    pub accuracy: ScoreAccumulator,
    pub f1_score: ScoreAccumulator,
}

impl ExperimentSummary {
    pub fn best_accuracy(&self) -> Option<f64> {
        self.accuracy.best()
    }

    pub fn mean_accuracy(&self) -> Option<f64> {
        self.accuracy.mean()
    }

    pub fn best_f1(&self) -> Option<f64> {
        self.f1_score.best()
    }

    pub fn mean_f1(&self) -> Option<f64> {
        self.f1_score.mean()
    }
}

/// Runs the configured number of repetitions over one dataset
pub struct Experiment {
    config: ExperimentConfig,
    voter: WeightedVoter,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let voter = WeightedVoter::new(config.vote_exponent, config.min_weight)?;
        Ok(Self { config, voter })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run every repetition with an RNG seeded from the config (or entropy)
    pub fn run(&self, dataset: &Dataset) -> Result<ExperimentSummary> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run_with_rng(dataset, &mut rng)
    }

    pub fn run_with_rng<R: Rng + ?Sized>(&self, dataset: &Dataset, rng: &mut R) -> Result<ExperimentSummary> {
        let started_at = Utc::now();
        let start = Instant::now();

        let mut repetitions = Vec::with_capacity(self.config.repetitions);
        let mut accuracy = ScoreAccumulator::new();
        let mut f1_score = ScoreAccumulator::new();

        for index in 0..self.config.repetitions {
            let split = HoldoutSplit::generate(dataset.n_samples(), self.config.test_size, rng)?;
            let result = self.run_repetition(index, dataset, &split)?;

            info!(
                repetition = index + 1,
                accuracy = result.metrics.accuracy,
                f1 = result.metrics.f1_score,
                auc = result.roc.as_ref().map(|r| r.auc),
                "Repetition finished"
            );

            accuracy.push(result.metrics.accuracy);
            f1_score.push(result.metrics.f1_score);
            repetitions.push(result);
        }

        Ok(ExperimentSummary {
            started_at,
            elapsed_secs: start.elapsed().as_secs_f64(),
            n_samples: dataset.n_samples(),
            n_features: dataset.n_features(),
            config: self.config.clone(),
            repetitions,
            accuracy,
            f1_score,
        })
    }

    /// Train every subset on the split's training rows, score it on the
    /// machine rows, then let the subsets vote on each hand row.
    pub fn run_repetition(&self, index: usize, dataset: &Dataset, split: &HoldoutSplit) -> Result<RepetitionResult> {
        let train = dataset.select_rows(&split.train);
        let machine = dataset.select_rows(&split.machine);
        let hand = dataset.select_rows(&split.hand);

        debug!(
            repetition = index + 1,
            train = train.n_samples(),
            machine = machine.n_samples(),
            hand = hand.n_samples(),
            "Split drawn"
        );

        let models = self.train_models(&train, &machine)?;
        let subset_scores = models
            .iter()
            .map(|m| SubsetScore {
                name: m.name().to_string(),
                accuracy: m.accuracy(),
                weight: m.weight(),
            })
            .collect();

        let mut y_pred = Vec::with_capacity(hand.n_samples());
        let mut scores = Vec::with_capacity(hand.n_samples());
        for row in hand.features().rows() {
            let votes = collect_votes(&models, row)?;
            let decision = self.voter.decide(&votes);
            y_pred.push(decision.label);
            scores.push(decision.score);
        }

        let y_true = hand.labels().to_vec();
        let metrics = ClassificationMetrics::compute(&y_true, &y_pred)?;
        let roc = match RocCurve::compute(&y_true, &scores) {
            Ok(roc) => Some(roc),
            Err(e) => {
                warn!(repetition = index + 1, error = %e, "ROC curve skipped");
                None
            }
        };

        Ok(RepetitionResult {
            index,
            n_train: train.n_samples(),
            subset_scores,
            y_true,
            y_pred,
            scores,
            metrics,
            roc,
        })
    }

    /// One fitted, weighted model per configured subset
    pub fn train_models(&self, train: &Dataset, machine: &Dataset) -> Result<Vec<TrainedSubsetModel>> {
        self.config
            .subsets
            .iter()
            .map(|subset| {
                TrainedSubsetModel::train(
                    subset,
                    train,
                    machine,
                    self.config.n_neighbors,
                    self.config.accuracy_multiplier,
                )
            })
            .collect()
    }
}
