//! Precomputed artifacts produced by the offline training pipeline.
//!
//! Four files are read once at startup:
//! - popular books (`top_20_books.json`): records, popularity order
//! - books (`top_books.json`): full metadata records
//! - neighbor index (`model_knn.json`): fitted index parameters
//! - ratings pivot (`ratings_pivot.json`): `orient="split"` frame, books x users
//!
//! Each artifact loads on its own. A failure is kept as an [`ArtifactFailure`]
//! so the affected views can show a notice while the rest keeps serving.

pub mod books;
pub mod model;
pub mod popular;
pub mod ratings;

pub use books::BookCatalog;
pub use model::{DistanceMetric, IndexParams};
pub use popular::{PopularBooks, PopularPage, PopularSummary};
pub use ratings::RatingsMatrix;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed artifact: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Load failure retained for display and readiness reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactFailure {
    pub artifact: &'static str,
    pub message: String,
}

impl ArtifactFailure {
    pub fn new(artifact: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            artifact,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ArtifactFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error loading {}: {}", self.artifact, self.message)
    }
}

pub type Loaded<T> = std::result::Result<Arc<T>, ArtifactFailure>;

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub popular_books: PathBuf,
    pub books: PathBuf,
    pub model: PathBuf,
    pub ratings: PathBuf,
}

pub struct LoadedArtifacts {
    pub popular_books: Loaded<PopularBooks>,
    pub books: Loaded<BookCatalog>,
    pub model: Loaded<IndexParams>,
    pub ratings: Loaded<RatingsMatrix>,
}

impl LoadedArtifacts {
    pub fn load(paths: &ArtifactPaths) -> Self {
        Self {
            popular_books: track("popular_books", &paths.popular_books, PopularBooks::load),
            books: track("books", &paths.books, BookCatalog::load),
            model: track("model", &paths.model, IndexParams::load),
            ratings: track("ratings", &paths.ratings, RatingsMatrix::load),
        }
    }

    pub fn failures(&self) -> Vec<ArtifactFailure> {
        [
            self.popular_books.as_ref().err(),
            self.books.as_ref().err(),
            self.model.as_ref().err(),
            self.ratings.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

fn track<T>(artifact: &'static str, path: &Path, load: fn(&Path) -> Result<T>) -> Loaded<T> {
    match load(path) {
        Ok(value) => {
            info!(artifact, path = %path.display(), "Artifact loaded");
            Ok(Arc::new(value))
        }
        Err(err) => {
            error!(artifact, path = %path.display(), error = %err, "Artifact load failed");
            Err(ArtifactFailure::new(artifact, err))
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_are_reported_per_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("top_20_books.json"),
            r#"[{"book_title": "Wild Animus", "num_ratings": 581, "avg_rating": 1.02}]"#,
        )
        .unwrap();

        let paths = ArtifactPaths {
            popular_books: dir.path().join("top_20_books.json"),
            books: dir.path().join("top_books.json"),
            model: dir.path().join("model_knn.json"),
            ratings: dir.path().join("ratings_pivot.json"),
        };

        let loaded = LoadedArtifacts::load(&paths);
        assert!(loaded.popular_books.is_ok());

        let failed: Vec<&str> = loaded.failures().iter().map(|f| f.artifact).collect();
        assert_eq!(failed, vec!["books", "model", "ratings"]);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
