//! Model training module
//!
//! Provides the brute-force K-Nearest Neighbors classifier every feature
//! subset is built on.

pub mod knn;

pub use knn::{euclidean_distance, KnnClassifier, KnnConfig};
