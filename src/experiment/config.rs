//! Experiment configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::DataConfig;
use crate::ensemble::FeatureSubset;
use crate::error::{CytologyError, Result};

/// Every knob of one experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Neighbors consulted by every KNN model
    pub n_neighbors: usize,

    /// Factor turning a subset's accuracy into its voting weight
    pub accuracy_multiplier: f64,

    /// Power applied to each weight before it is added to the vote
    pub vote_exponent: f64,

    /// Fraction of rows held out (then halved into hand and machine parts)
    pub test_size: f64,

    /// Subsets weighing less than this do not vote
    pub min_weight: f64,

    /// Independent randomized splits to run
    pub repetitions: usize,

    /// Seed for the split RNG; entropy when absent
    pub seed: Option<u64>,

    /// Named feature subsets, one KNN model each
    pub subsets: Vec<FeatureSubset>,

    /// CSV cleaning rules
    pub data: DataConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 20,
            accuracy_multiplier: 10.0,
            vote_exponent: 2.0,
            test_size: 0.1,
            min_weight: 0.0,
            repetitions: 2,
            seed: None,
            subsets: default_subsets(),
            data: DataConfig::default(),
        }
    }
}

/// Three hand-picked combinations plus one single-column model per
/// frequently informative blood-count feature
pub fn default_subsets() -> Vec<FeatureSubset> {
    let mut subsets = vec![
        FeatureSubset::new("Comb-1", &["MCHC", "RDWSD", "RDWCV", "PCT", "PDW"]),
        FeatureSubset::new("Comb-2", &["WBC", "MCV", "MCHC", "RDWSD", "RDWCV", "PCT", "PDW"]),
        FeatureSubset::new(
            "Comb-3",
            &["EOS", "BASO", "WBC", "MONO", "HCT", "MCHC", "RDWSD", "RDWCV", "MPV", "PCT", "PDW"],
        ),
    ];

    subsets.extend(
        ["LYM", "BASO", "HGB", "HCT", "MCV", "MCHC", "RDWSD", "RDWCV", "PCT", "PDW"]
            .into_iter()
            .map(FeatureSubset::single),
    );
    subsets
}

impl ExperimentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config; omitted fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method to set the neighbor count
    pub fn with_n_neighbors(mut self, k: usize) -> Self {
        self.n_neighbors = k;
        self
    }

    /// Builder method to set the accuracy multiplier
    pub fn with_accuracy_multiplier(mut self, multiplier: f64) -> Self {
        self.accuracy_multiplier = multiplier;
        self
    }

    /// Builder method to set the vote exponent
    pub fn with_vote_exponent(mut self, exponent: f64) -> Self {
        self.vote_exponent = exponent;
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the minimum voting weight
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    /// Builder method to set the repetition count
    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Builder method to fix the split seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to replace the feature subsets
    pub fn with_subsets(mut self, subsets: Vec<FeatureSubset>) -> Self {
        self.subsets = subsets;
        self
    }

    /// Builder method to replace the cleaning rules
    pub fn with_data(mut self, data: DataConfig) -> Self {
        self.data = data;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_neighbors == 0 {
            return Err(CytologyError::ConfigError("n_neighbors must be at least 1".to_string()));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(CytologyError::ConfigError(format!(
                "test_size must lie strictly between 0 and 1, got {}",
                self.test_size
            )));
        }
        if !self.accuracy_multiplier.is_finite() || self.accuracy_multiplier <= 0.0 {
            return Err(CytologyError::ConfigError(format!(
                "accuracy_multiplier must be positive, got {}",
                self.accuracy_multiplier
            )));
        }
        if !self.vote_exponent.is_finite() || self.vote_exponent < 0.0 {
            return Err(CytologyError::ConfigError(format!(
                "vote_exponent must be finite and non-negative, got {}",
                self.vote_exponent
            )));
        }
        if self.min_weight.is_nan() {
            return Err(CytologyError::ConfigError("min_weight must be a number".to_string()));
        }
        if self.repetitions == 0 {
            return Err(CytologyError::ConfigError("repetitions must be at least 1".to_string()));
        }
        if self.subsets.is_empty() {
            return Err(CytologyError::ConfigError("at least one feature subset is required".to_string()));
        }
        for subset in &self.subsets {
            if subset.features.is_empty() {
                return Err(CytologyError::ConfigError(format!(
                    "feature subset '{}' has no columns",
                    subset.name
                )));
            }
        }
        self.data.validate()
    }
}
