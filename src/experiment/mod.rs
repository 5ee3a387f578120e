//! Experiment orchestration
//!
//! [`ExperimentConfig`] gathers every tunable, [`Experiment`] runs the
//! repetitions and returns an [`ExperimentSummary`] instead of printing.

mod config;
mod runner;

pub use config::{default_subsets, ExperimentConfig};
pub use runner::{Experiment, ExperimentSummary, RepetitionResult, ScoreAccumulator, SubsetScore};
