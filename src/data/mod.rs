//! Data loading, cleaning and splitting
//!
//! - [`DataLoader`] reads the CSV with polars and applies the [`DataConfig`]
//!   cleaning rules
//! - [`Dataset`] holds the resulting feature matrix and labels
//! - [`HoldoutSplit`] draws the randomized train / hand / machine split

mod config;
mod dataset;
mod loader;
pub mod split;

pub use config::DataConfig;
pub use dataset::Dataset;
pub use loader::DataLoader;
pub use split::HoldoutSplit;
