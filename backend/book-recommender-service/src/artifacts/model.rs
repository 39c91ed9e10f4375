use super::{read_json, ArtifactError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Distance metric the index was fitted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    Manhattan,
    Minkowski(f64),
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Cosine => write!(f, "cosine"),
            DistanceMetric::Euclidean => write!(f, "euclidean"),
            DistanceMetric::Manhattan => write!(f, "manhattan"),
            DistanceMetric::Minkowski(p) => write!(f, "minkowski(p={p})"),
        }
    }
}

/// Fitted nearest-neighbor parameters exported alongside the ratings pivot.
///
/// ```json
/// {"metric": "cosine", "algorithm": "brute", "n_neighbors": 5,
///  "n_samples_fit": 742, "n_features_in": 888}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexParams {
    pub metric: DistanceMetric,
    pub algorithm: String,
    pub n_neighbors: usize,
    /// Row count seen at fit time, checked against the ratings matrix.
    pub n_samples_fit: Option<usize>,
    /// Column count seen at fit time, checked against the ratings matrix.
    pub n_features_in: Option<usize>,
}

#[derive(Deserialize)]
struct RawIndexParams {
    #[serde(default = "default_metric")]
    metric: String,
    #[serde(default)]
    p: Option<f64>,
    #[serde(default = "default_algorithm")]
    algorithm: String,
    #[serde(default = "default_n_neighbors")]
    n_neighbors: usize,
    #[serde(default)]
    n_samples_fit: Option<usize>,
    #[serde(default)]
    n_features_in: Option<usize>,
}

fn default_metric() -> String {
    "minkowski".to_string()
}

fn default_algorithm() -> String {
    "auto".to_string()
}

fn default_n_neighbors() -> usize {
    5
}

impl IndexParams {
    pub fn load(path: &Path) -> Result<Self> {
        let raw: RawIndexParams = read_json(path)?;
        Self::from_raw(raw)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: RawIndexParams = serde_json::from_slice(data)
            .map_err(|e| ArtifactError::Malformed(format!("index parameters: {e}")))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawIndexParams) -> Result<Self> {
        let metric = match raw.metric.to_ascii_lowercase().as_str() {
            "cosine" => DistanceMetric::Cosine,
            "euclidean" | "l2" => DistanceMetric::Euclidean,
            "manhattan" | "cityblock" | "l1" => DistanceMetric::Manhattan,
            "minkowski" => match raw.p.unwrap_or(2.0) {
                p if p == 1.0 => DistanceMetric::Manhattan,
                p if p == 2.0 => DistanceMetric::Euclidean,
                p if p.is_finite() && p >= 1.0 => DistanceMetric::Minkowski(p),
                p => {
                    return Err(ArtifactError::Malformed(format!(
                        "minkowski p must be >= 1, got {p}"
                    )))
                }
            },
            other => {
                return Err(ArtifactError::Malformed(format!(
                    "unsupported distance metric: {other}"
                )))
            }
        };

        if raw.n_neighbors == 0 {
            return Err(ArtifactError::Malformed(
                "n_neighbors must be positive".to_string(),
            ));
        }

        Ok(Self {
            metric,
            algorithm: raw.algorithm,
            n_neighbors: raw.n_neighbors,
            n_samples_fit: raw.n_samples_fit,
            n_features_in: raw.n_features_in,
        })
    }
}
