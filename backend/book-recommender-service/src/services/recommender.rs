use super::knn::{IndexError, Neighbor, NeighborIndex};
use crate::artifacts::{BookCatalog, RatingsMatrix};
use crate::metrics;
use crate::models::Recommendation;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Neighbors requested from the index; the first one is the queried book.
pub const DEFAULT_QUERY_NEIGHBORS: usize = 6;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// Shown whenever a lookup comes back empty.
pub const EMPTY_RESULT_HINT: &str = "No book found with that title or no recommendations available. Please try another book title.";

/// Reasons a lookup yields no recommendations. `Display` is the user-facing
/// notice.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("Book title not found in the database.")]
    TitleNotFound(String),

    #[error("ISBN not found in the ratings data.")]
    IsbnNotInRatings(String),

    #[error("Not enough similar books found.")]
    InsufficientData { expected: usize, found: usize },

    #[error("Error generating recommendations: {0}")]
    Index(#[from] IndexError),
}

impl LookupError {
    pub fn outcome(&self) -> &'static str {
        match self {
            LookupError::TitleNotFound(_) => "title_not_found",
            LookupError::IsbnNotInRatings(_) => "isbn_not_in_ratings",
            LookupError::InsufficientData { .. } => "insufficient_data",
            LookupError::Index(_) => "index_error",
        }
    }
}

/// Result of a lookup that never fails: recommendations plus an optional
/// notice explaining an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOutcome {
    pub query: String,
    pub results: Vec<Recommendation>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct RecommenderSettings {
    pub query_neighbors: usize,
    pub max_results: usize,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            query_neighbors: DEFAULT_QUERY_NEIGHBORS,
            max_results: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub metric: String,
    pub fitted_neighbors: usize,
    pub query_neighbors: usize,
    pub max_results: usize,
    pub matrix_books: usize,
    pub matrix_users: usize,
    pub catalog_books: usize,
}

/// Title -> similar books, over read-only artifacts.
pub struct Recommender {
    catalog: Arc<BookCatalog>,
    ratings: Arc<RatingsMatrix>,
    index: NeighborIndex,
    settings: RecommenderSettings,
}

impl Recommender {
    pub fn new(
        catalog: Arc<BookCatalog>,
        ratings: Arc<RatingsMatrix>,
        index: NeighborIndex,
        settings: RecommenderSettings,
    ) -> Self {
        Self {
            catalog,
            ratings,
            index,
            settings,
        }
    }

    /// Similar books for `title`, nearest first, never including the book
    /// itself.
    ///
    /// Algorithm:
    /// 1. Resolve the title to its ISBN (first matching record)
    /// 2. Resolve the ISBN to its ratings row
    /// 3. Query `query_neighbors` nearest rows and drop the query row
    /// 4. Join neighbor ISBNs to metadata, carrying each distance by ISBN
    /// 5. Sort by distance and keep `max_results`
    pub fn recommend(&self, title: &str) -> Result<Vec<Recommendation>, LookupError> {
        let title = title.trim();

        let book = self
            .catalog
            .find_by_title(title)
            .ok_or_else(|| LookupError::TitleNotFound(title.to_string()))?;

        let query_row = self
            .ratings
            .row_of(&book.isbn)
            .ok_or_else(|| LookupError::IsbnNotInRatings(book.isbn.clone()))?;

        let k = self.settings.query_neighbors.min(self.index.n_samples());
        let neighbors = self.index.kneighbors(self.ratings.row(query_row), k)?;

        // The query row normally comes back first, but ties at distance 0 can
        // reorder it, so drop it by identity.
        let neighbors: Vec<Neighbor> = neighbors
            .into_iter()
            .filter(|n| n.row != query_row)
            .take(k.saturating_sub(1))
            .collect();

        let mut by_isbn: HashMap<&str, Neighbor> = HashMap::with_capacity(neighbors.len());
        for neighbor in &neighbors {
            if let Some(isbn) = self.ratings.isbn_at(neighbor.row) {
                by_isbn.insert(isbn, *neighbor);
            }
        }

        let wanted: HashSet<&str> = by_isbn.keys().copied().collect();
        let records = self.catalog.records_for_isbns(&wanted);

        if records.len() != neighbors.len() {
            warn!(
                title,
                neighbors = neighbors.len(),
                records = records.len(),
                "Neighbor ISBNs do not line up with book metadata"
            );
            return Err(LookupError::InsufficientData {
                expected: neighbors.len(),
                found: records.len(),
            });
        }

        let mut ranked: Vec<(Neighbor, Recommendation)> = records
            .into_iter()
            .filter_map(|record| {
                by_isbn.get(record.isbn.as_str()).map(|neighbor| {
                    (
                        *neighbor,
                        Recommendation {
                            book: record.clone(),
                            distance: neighbor.distance,
                        },
                    )
                })
            })
            .collect();

        ranked.sort_by(|(a, _), (b, _)| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.row.cmp(&b.row))
        });
        ranked.truncate(self.settings.max_results);

        debug!(title, results = ranked.len(), "Recommendations computed");

        Ok(ranked.into_iter().map(|(_, rec)| rec).collect())
    }

    /// [`Self::recommend`] with failures folded into a notice.
    pub fn lookup(&self, title: &str) -> LookupOutcome {
        let query = title.trim().to_string();
        let start = Instant::now();

        match self.recommend(&query) {
            Ok(results) => {
                let outcome = if results.is_empty() { "empty" } else { "found" };
                metrics::observe_lookup(outcome, start.elapsed());
                info!(title = %query, results = results.len(), "Recommendation lookup");
                LookupOutcome {
                    query,
                    results,
                    notice: None,
                }
            }
            Err(err) => {
                metrics::observe_lookup(err.outcome(), start.elapsed());
                match &err {
                    LookupError::Index(inner) => {
                        warn!(title = %query, error = %inner, "Neighbor query failed")
                    }
                    other => info!(title = %query, outcome = other.outcome(), "No recommendations"),
                }
                LookupOutcome {
                    query,
                    results: Vec::new(),
                    notice: Some(err.to_string()),
                }
            }
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            metric: self.index.metric().to_string(),
            fitted_neighbors: self.index.default_neighbors(),
            query_neighbors: self.settings.query_neighbors,
            max_results: self.settings.max_results,
            matrix_books: self.ratings.n_books(),
            matrix_users: self.ratings.n_users(),
            catalog_books: self.catalog.len(),
        }
    }
}
