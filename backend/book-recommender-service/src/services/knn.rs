// ============================================
// Brute-force k-Nearest-Neighbors index
// ============================================
//
// Exact neighbor search over the rows of the ratings pivot, using the metric
// the index was fitted with. Ratings matrices here are a few hundred rows, so
// a full scan per query is cheaper than building a tree.

use crate::artifacts::{DistanceMetric, IndexParams, RatingsMatrix};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("index was fitted on {expected} rows but the ratings matrix has {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("index was fitted on {expected} features but the ratings matrix has {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("query has {actual} features, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("n_neighbors must be positive")]
    ZeroNeighbors,

    #[error("expected n_neighbors <= n_samples_fit, got n_neighbors={requested}, n_samples_fit={available}")]
    TooManyNeighbors { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f64,
}

pub struct NeighborIndex {
    metric: DistanceMetric,
    default_neighbors: usize,
    data: Array2<f64>,
    /// L2 norm per fitted row, used by the cosine metric
    norms: Array1<f64>,
}

impl NeighborIndex {
    /// Fit the index over every row of `ratings`, checking the shape the
    /// parameters were exported with.
    pub fn fit(params: &IndexParams, ratings: &RatingsMatrix) -> Result<Self> {
        if let Some(expected) = params.n_samples_fit {
            if expected != ratings.n_books() {
                return Err(IndexError::SampleCountMismatch {
                    expected,
                    actual: ratings.n_books(),
                });
            }
        }
        if let Some(expected) = params.n_features_in {
            if expected != ratings.n_users() {
                return Err(IndexError::FeatureCountMismatch {
                    expected,
                    actual: ratings.n_users(),
                });
            }
        }

        if params.algorithm != "brute" {
            debug!(
                algorithm = %params.algorithm,
                "Exact search uses a full scan regardless of the fitted algorithm"
            );
        }

        Ok(Self::from_rows(
            params.metric,
            params.n_neighbors,
            ratings.values().clone(),
        ))
    }

    pub fn from_rows(metric: DistanceMetric, default_neighbors: usize, data: Array2<f64>) -> Self {
        let norms = data.map_axis(Axis(1), |row| row.dot(&row).sqrt());
        Self {
            metric,
            default_neighbors,
            data,
            norms,
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn default_neighbors(&self) -> usize {
        self.default_neighbors
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    /// The `k` fitted rows closest to `query`, nearest first.
    ///
    /// Equal distances are ordered by row so repeated queries return the same
    /// list.
    pub fn kneighbors(&self, query: ArrayView1<'_, f64>, k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(IndexError::ZeroNeighbors);
        }
        if query.len() != self.n_features() {
            return Err(IndexError::DimensionMismatch {
                expected: self.n_features(),
                actual: query.len(),
            });
        }
        if k > self.n_samples() {
            return Err(IndexError::TooManyNeighbors {
                requested: k,
                available: self.n_samples(),
            });
        }

        let query_norm = query.dot(&query).sqrt();
        let mut neighbors: Vec<Neighbor> = self
            .data
            .outer_iter()
            .enumerate()
            .map(|(row, fitted)| Neighbor {
                row,
                distance: self.distance(&query, query_norm, &fitted, self.norms[row]),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.row.cmp(&b.row))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }

    fn distance(
        &self,
        a: &ArrayView1<'_, f64>,
        a_norm: f64,
        b: &ArrayView1<'_, f64>,
        b_norm: f64,
    ) -> f64 {
        match self.metric {
            DistanceMetric::Cosine => {
                if a_norm == 0.0 || b_norm == 0.0 {
                    // a zero vector has no direction; treat it as unrelated
                    1.0
                } else {
                    (1.0 - a.dot(b) / (a_norm * b_norm)).clamp(0.0, 2.0)
                }
            }
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Minkowski(p) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs().powf(p))
                .sum::<f64>()
                .powf(1.0 / p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn index(metric: DistanceMetric) -> NeighborIndex {
        NeighborIndex::from_rows(
            metric,
            3,
            array![
                [5.0, 4.0, 0.0, 0.0],
                [5.0, 4.0, 0.0, 1.0],
                [4.0, 5.0, 0.0, 0.0],
                [0.0, 0.0, 5.0, 4.0],
                [0.0, 0.0, 0.0, 0.0],
            ],
        )
    }

    #[test]
    fn test_cosine_neighbors_nearest_first() {
        let idx = index(DistanceMetric::Cosine);
        let query = array![5.0, 4.0, 0.0, 0.0];

        let neighbors = idx.kneighbors(query.view(), 3).unwrap();
        let rows: Vec<usize> = neighbors.iter().map(|n| n.row).collect();

        assert_eq!(rows, vec![0, 1, 2]);
        assert!(neighbors[0].distance.abs() < 1e-12);
        // 1 - 41 / (sqrt(41) * sqrt(42))
        assert!((neighbors[1].distance - 0.011976).abs() < 1e-5);
        // 1 - 40 / 41
        assert!((neighbors[2].distance - 0.024390).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_zero_vector_is_unrelated() {
        let idx = index(DistanceMetric::Cosine);
        let query = array![0.0, 0.0, 5.0, 4.0];

        let neighbors = idx.kneighbors(query.view(), 5).unwrap();
        assert_eq!(neighbors[0].row, 3);
        // row 1 shares one user; rows 0 and 2 are orthogonal and row 4 is
        // zero, so those three tie at distance 1 and come back in row order
        let tail: Vec<(usize, f64)> = neighbors[1..]
            .iter()
            .map(|n| (n.row, (n.distance * 1e6).round() / 1e6))
            .collect();
        assert_eq!(tail[0].0, 1);
        assert_eq!(tail[1..], [(0, 1.0), (2, 1.0), (4, 1.0)]);
    }

    #[test]
    fn test_euclidean_and_manhattan() {
        let query = array![5.0, 4.0, 0.0, 0.0];

        let euclid = index(DistanceMetric::Euclidean)
            .kneighbors(query.view(), 3)
            .unwrap();
        assert_eq!(euclid[1].row, 1);
        assert!((euclid[1].distance - 1.0).abs() < 1e-12);
        assert!((euclid[2].distance - 2f64.sqrt()).abs() < 1e-12);

        let manhattan = index(DistanceMetric::Manhattan)
            .kneighbors(query.view(), 3)
            .unwrap();
        assert!((manhattan[1].distance - 1.0).abs() < 1e-12);
        assert!((manhattan[2].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_queries() {
        let idx = index(DistanceMetric::Cosine);
        let query = array![1.0, 0.0, 0.0, 0.0];

        assert_eq!(
            idx.kneighbors(query.view(), 0).unwrap_err(),
            IndexError::ZeroNeighbors
        );
        assert_eq!(
            idx.kneighbors(query.view(), 6).unwrap_err(),
            IndexError::TooManyNeighbors {
                requested: 6,
                available: 5
            }
        );

        let short = array![1.0, 0.0];
        assert_eq!(
            idx.kneighbors(short.view(), 2).unwrap_err(),
            IndexError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_fit_checks_exported_shape() {
        let ratings = RatingsMatrix::new(
            vec!["a".into(), "b".into()],
            vec!["u1".into(), "u2".into(), "u3".into()],
            Array2::zeros((2, 3)),
        )
        .unwrap();

        let mut params = IndexParams {
            metric: DistanceMetric::Cosine,
            algorithm: "brute".to_string(),
            n_neighbors: 5,
            n_samples_fit: Some(2),
            n_features_in: Some(3),
        };
        let idx = NeighborIndex::fit(&params, &ratings).unwrap();
        assert_eq!((idx.n_samples(), idx.n_features()), (2, 3));

        params.n_samples_fit = Some(742);
        assert!(matches!(
            NeighborIndex::fit(&params, &ratings),
            Err(IndexError::SampleCountMismatch { expected: 742, actual: 2 })
        ));

        params.n_samples_fit = None;
        params.n_features_in = Some(888);
        assert!(matches!(
            NeighborIndex::fit(&params, &ratings),
            Err(IndexError::FeatureCountMismatch { expected: 888, actual: 3 })
        ));
    }
}
