use crate::artifacts::{ArtifactFailure, Loaded, LoadedArtifacts, PopularBooks};
use crate::config::ViewSettings;
use crate::services::{NeighborIndex, Recommender, RecommenderSettings};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Read-only data shared by every worker.
pub struct AppState {
    pub popular_books: Loaded<PopularBooks>,
    /// Needs books, ratings and a fitted index; otherwise the failures that
    /// keep the recommender offline.
    pub recommender: Result<Arc<Recommender>, Vec<ArtifactFailure>>,
    pub views: ViewSettings,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn build(
        artifacts: LoadedArtifacts,
        settings: RecommenderSettings,
        views: ViewSettings,
    ) -> Self {
        let LoadedArtifacts {
            popular_books,
            books,
            model,
            ratings,
        } = artifacts;

        let recommender = match (books, model, ratings) {
            (Ok(books), Ok(model), Ok(ratings)) => match NeighborIndex::fit(&model, &ratings) {
                Ok(index) => {
                    info!(
                        metric = %index.metric(),
                        rows = index.n_samples(),
                        users = index.n_features(),
                        "Neighbor index ready"
                    );
                    Ok(Arc::new(Recommender::new(books, ratings, index, settings)))
                }
                Err(err) => {
                    error!(error = %err, "Neighbor index does not match the ratings matrix");
                    Err(vec![ArtifactFailure::new("model", err)])
                }
            },
            (books, model, ratings) => Err([books.err(), model.err(), ratings.err()]
                .into_iter()
                .flatten()
                .collect()),
        };

        Self {
            popular_books,
            recommender,
            views,
            loaded_at: Utc::now(),
        }
    }

    /// Every artifact problem, for readiness reporting.
    pub fn failures(&self) -> Vec<ArtifactFailure> {
        let mut failures: Vec<ArtifactFailure> =
            self.popular_books.as_ref().err().cloned().into_iter().collect();
        if let Err(recommender_failures) = &self.recommender {
            failures.extend(recommender_failures.iter().cloned());
        }
        failures
    }
}
