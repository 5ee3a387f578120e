//! Command-line interface
//!
//! `run` executes the experiment, `info` describes a dataset, `config`
//! prints the default configuration.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{DataLoader, Dataset};
use crate::experiment::{Experiment, ExperimentConfig, ExperimentSummary, RepetitionResult};
use crate::export;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn percent(value: f64) -> String {
    format!("{:.3}%", value * 100.0)
}

fn kv(key: &str, val: &str) {
    println!("  {:<18} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cytology-knn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Feature-subset KNN ensemble for cytology blood-count data")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the ensemble experiment
    Run {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// JSON configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the train/test splits
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of repetitions
        #[arg(short, long)]
        repetitions: Option<usize>,

        /// Directory for ROC CSVs and summary.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show dataset information after cleaning
    Info {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// JSON configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<ExperimentConfig> {
    match path {
        Some(path) => Ok(ExperimentConfig::from_json_file(path)?),
        None => Ok(ExperimentConfig::default()),
    }
}

fn load_dataset(data_path: &Path, config: &ExperimentConfig) -> anyhow::Result<Dataset> {
    step_run("Loading data");
    let start = Instant::now();
    let dataset = DataLoader::new(config.data.clone()).load(data_path)?;
    step_done(&format!(
        "{} rows × {} features in {:?}",
        dataset.n_samples(),
        dataset.n_features(),
        start.elapsed()
    ));
    Ok(dataset)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(
    data_path: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
    repetitions: Option<usize>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Run");

    let mut config = load_config(config_path)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(n) = repetitions {
        config = config.with_repetitions(n);
    }

    let dataset = load_dataset(data_path, &config)?;
    let experiment = Experiment::new(config)?;

    step_run(&format!(
        "Running {} repetitions over {} subsets",
        experiment.config().repetitions,
        experiment.config().subsets.len()
    ));
    let start = Instant::now();
    let summary = experiment.run(&dataset)?;
    step_done(&format!("{:?}", start.elapsed()));

    for rep in &summary.repetitions {
        print_repetition(rep);
    }
    print_summary(&summary);

    if let Some(dir) = output {
        step_run(&format!("Saving → {}", dir.display()));
        let written = export::write_all(&summary, dir)?;
        step_done(&format!("{} files", written.len()));
    }

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    section("Info");

    let config = load_config(config_path)?;
    let dataset = load_dataset(data_path, &config)?;

    println!();
    kv("Rows", &dataset.n_samples().to_string());
    kv("Features", &dataset.n_features().to_string());
    for (label, count) in dataset.class_counts() {
        let share = count as f64 / dataset.n_samples().max(1) as f64;
        kv(&format!("Class {label}"), &format!("{count} ({})", percent(share)));
    }
    println!();
    println!("  {}", muted("Columns"));
    println!("  {}", dataset.feature_names().join(", "));
    println!();
    Ok(())
}

pub fn cmd_config(output: Option<&Path>) -> anyhow::Result<()> {
    let json = ExperimentConfig::default().to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("  {} {}", ok("✓"), format!("Wrote {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_repetition(rep: &RepetitionResult) {
    section(&format!("Repetition {}", rep.index + 1));

    println!("  {:<18} {:>10} {:>10}", muted("Subset"), muted("Accuracy"), muted("Weight"));
    for score in &rep.subset_scores {
        println!("  {:<18} {:>10} {:>10.3}", score.name, percent(score.accuracy), score.weight);
    }
    println!("  {}", dim(&"─".repeat(40)));

    kv("Accuracy", &percent(rep.metrics.accuracy));
    kv("Precision", &percent(rep.metrics.precision));
    kv("Recall", &percent(rep.metrics.recall));
    kv("F1 Score", &percent(rep.metrics.f1_score));
    match &rep.roc {
        Some(roc) => kv("AUC", &format!("{:.4}", roc.auc)),
        None => kv("AUC", "n/a (single class in hand split)"),
    }
}

fn print_summary(summary: &ExperimentSummary) {
    section("Summary");
    let show = |v: Option<f64>| v.map(percent).unwrap_or_else(|| "n/a".to_string());
    kv("Best Accuracy", &show(summary.best_accuracy()));
    kv("Average Accuracy", &show(summary.mean_accuracy()));
    kv("Best F1 Score", &show(summary.best_f1()));
    kv("Average F1 Score", &show(summary.mean_f1()));
}
