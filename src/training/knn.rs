//! K-Nearest Neighbors classifier
//!
//! Brute-force KNN with Euclidean distance and majority vote. Every query is
//! compared against every stored training row, so cost is O(n·d) per query.

use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CytologyError, Result};

/// KNN configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnConfig {
    /// Number of neighbors
    pub n_neighbors: usize,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self { n_neighbors: 20 }
    }
}

/// K-Nearest Neighbors classifier over integer class labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnClassifier {
    config: KnnConfig,
    x_train: Option<Array2<f64>>,
    y_train: Option<Array1<i64>>,
}

impl KnnClassifier {
    pub fn new(config: KnnConfig) -> Self {
        Self {
            config,
            x_train: None,
            y_train: None,
        }
    }

    /// Create with default config and specified k
    pub fn with_k(k: usize) -> Self {
        Self::new(KnnConfig { n_neighbors: k })
    }

    pub fn n_neighbors(&self) -> usize {
        self.config.n_neighbors
    }

    pub fn is_fitted(&self) -> bool {
        self.x_train.is_some()
    }

    /// Fit the classifier (stores a copy of the training data)
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>) -> Result<()> {
        if self.config.n_neighbors == 0 {
            return Err(CytologyError::InvalidParameter {
                name: "n_neighbors".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if x.nrows() != y.len() {
            return Err(CytologyError::ShapeError {
                expected: format!("{} labels", x.nrows()),
                actual: format!("{} labels", y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(CytologyError::ValidationError(
                "Cannot fit KNN on an empty training set".to_string(),
            ));
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.clone());
        Ok(())
    }

    /// Predict a label for every row of `x`.
    ///
    /// Rows are independent queries; they are evaluated in parallel and the
    /// output keeps the input order.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<i64>> {
        let (x_train, y_train) = self.training_data()?;
        let k = self.config.n_neighbors;

        (0..x.nrows())
            .into_par_iter()
            .map(|i| classify(x.row(i), x_train, y_train, k))
            .collect()
    }

    /// Predict the label of a single query row
    pub fn predict_one(&self, query: ArrayView1<f64>) -> Result<i64> {
        let (x_train, y_train) = self.training_data()?;
        classify(query, x_train, y_train, self.config.n_neighbors)
    }

    fn training_data(&self) -> Result<(&Array2<f64>, &Array1<i64>)> {
        match (&self.x_train, &self.y_train) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(CytologyError::ModelNotFitted),
        }
    }
}

/// Euclidean distance between two vectors of equal length
pub fn euclidean_distance(p: ArrayView1<f64>, q: ArrayView1<f64>) -> Result<f64> {
    if p.len() != q.len() {
        return Err(CytologyError::ShapeError {
            expected: format!("vector of length {}", p.len()),
            actual: format!("vector of length {}", q.len()),
        });
    }

    Ok(p.iter()
        .zip(q.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum::<f64>()
        .sqrt())
}

fn classify(
    query: ArrayView1<f64>,
    x_train: &Array2<f64>,
    y_train: &Array1<i64>,
    k: usize,
) -> Result<i64> {
    let mut neighbors: Vec<(f64, i64)> = Vec::with_capacity(x_train.nrows());
    for (row, &label) in x_train.rows().into_iter().zip(y_train.iter()) {
        neighbors.push((euclidean_distance(row, query)?, label));
    }

    neighbors.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    neighbors.truncate(k);

    majority_label(&neighbors).ok_or_else(|| {
        CytologyError::ValidationError("no training points to vote on".to_string())
    })
}

/// Most frequent label among `neighbors`, which must already be sorted by
/// distance. Equal counts go to the label seen first, i.e. the one owning the
/// closest neighbor.
fn majority_label(neighbors: &[(f64, i64)]) -> Option<i64> {
    // (label, count) in first-encounter order
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for &(_, label) in neighbors {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, c)) => *c += 1,
            None => counts.push((label, 1)),
        }
    }

    counts
        .into_iter()
        .fold(None, |best: Option<(i64, usize)>, (label, count)| match best {
            Some((_, best_count)) if count <= best_count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_cluster_data() -> (Array2<f64>, Array1<i64>) {
        let x = Array2::from_shape_vec((10, 2), vec![
            // Class 0 (low values)
            1.0, 1.0, 1.5, 1.5, 2.0, 2.0, 1.2, 1.8, 1.8, 1.2,
            // Class 1 (high values)
            8.0, 8.0, 8.5, 8.5, 9.0, 9.0, 8.2, 8.8, 8.8, 8.2,
        ]).unwrap();

        let y = Array1::from_vec(vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);

        (x, y)
    }

    #[test]
    fn test_distance_known_value() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];

        let dist = euclidean_distance(a.view(), b.view()).unwrap();
        assert!((dist - 5.0).abs() < 1e-12, "Euclidean distance should be 5.0");
    }

    #[test]
    fn test_distance_symmetric_and_zero_on_identity() {
        let a = array![1.5, -2.0, 7.25];
        let b = array![0.5, 3.0, -1.0];

        let ab = euclidean_distance(a.view(), b.view()).unwrap();
        let ba = euclidean_distance(b.view(), a.view()).unwrap();
        assert_eq!(ab, ba);
        assert!(ab > 0.0);
        assert_eq!(euclidean_distance(a.view(), a.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_shape_mismatch() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![1.0, 2.0];

        let err = euclidean_distance(a.view(), b.view()).unwrap_err();
        assert!(matches!(err, CytologyError::ShapeError { .. }));
    }

    #[test]
    fn test_k1_returns_label_of_identical_point() {
        let (x, y) = create_cluster_data();
        let mut knn = KnnClassifier::with_k(1);
        knn.fit(&x, &y).unwrap();

        for i in 0..x.nrows() {
            assert_eq!(knn.predict_one(x.row(i)).unwrap(), y[i]);
        }
    }

    #[test]
    fn test_predict_batch_perfect_on_clusters() {
        let (x, y) = create_cluster_data();
        let mut knn = KnnClassifier::with_k(3);
        knn.fit(&x, &y).unwrap();

        let queries = array![[1.1, 1.3], [8.9, 8.4], [2.1, 1.9], [9.2, 8.7]];
        let predictions = knn.predict(&queries).unwrap();
        assert_eq!(predictions, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_k_larger_than_training_set_uses_all_points() {
        let x = array![[0.0], [1.0], [10.0]];
        let y = array![1, 1, 0];
        let mut knn = KnnClassifier::with_k(50);
        knn.fit(&x, &y).unwrap();

        // All three neighbors vote: two 1s beat one 0 even next to the 0
        assert_eq!(knn.predict_one(array![10.0].view()).unwrap(), 1);
    }

    #[test]
    fn test_tie_goes_to_label_with_closest_neighbor() {
        let x = array![[0.0], [3.0], [1.0], [4.0]];
        let y = array![0, 0, 1, 1];
        let mut knn = KnnClassifier::with_k(4);
        knn.fit(&x, &y).unwrap();

        // 2 vs 2: label 1 owns the nearest point to 1.2
        assert_eq!(knn.predict_one(array![1.2].view()).unwrap(), 1);
        // 2 vs 2: label 0 owns the nearest point to -1.0
        assert_eq!(knn.predict_one(array![-1.0].view()).unwrap(), 0);
    }

    #[test]
    fn test_equal_distance_prefers_lower_label() {
        let x = array![[2.0], [0.0]];
        let y = array![1, 0];
        let mut knn = KnnClassifier::with_k(2);
        knn.fit(&x, &y).unwrap();

        assert_eq!(knn.predict_one(array![1.0].view()).unwrap(), 0);
    }

    #[test]
    fn test_query_width_mismatch_fails() {
        let (x, y) = create_cluster_data();
        let mut knn = KnnClassifier::with_k(1);
        knn.fit(&x, &y).unwrap();

        let result = knn.predict_one(array![1.0, 2.0, 3.0].view());
        assert!(matches!(result, Err(CytologyError::ShapeError { .. })));
    }

    #[test]
    fn test_predict_before_fit() {
        let knn = KnnClassifier::with_k(3);
        let result = knn.predict_one(array![1.0].view());
        assert!(matches!(result, Err(CytologyError::ModelNotFitted)));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let mut knn = KnnClassifier::with_k(0);
        assert!(knn.fit(&array![[1.0]], &array![0]).is_err());

        let mut knn = KnnClassifier::with_k(1);
        assert!(knn.fit(&array![[1.0], [2.0]], &array![0]).is_err());
        assert!(knn.fit(&Array2::zeros((0, 2)), &Array1::zeros(0)).is_err());
    }

    #[test]
    fn test_classify_without_neighbors() {
        let x_train: Array2<f64> = Array2::zeros((0, 2));
        let y_train: Array1<i64> = Array1::zeros(0);

        let result = classify(array![1.0, 2.0].view(), &x_train, &y_train, 3);
        assert!(matches!(result, Err(CytologyError::ValidationError(_))));
        assert_eq!(majority_label(&[]), None);
    }
}
