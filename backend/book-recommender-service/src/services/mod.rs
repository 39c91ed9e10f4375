//! Recommendation logic over the loaded artifacts.
//!
//! - knn: exact nearest-neighbor index over ratings rows
//! - recommender: title lookup, neighbor query and metadata join

pub mod knn;
pub mod recommender;

pub use knn::{IndexError, Neighbor, NeighborIndex};
pub use recommender::{
    LookupError, LookupOutcome, ModelInfo, Recommender, RecommenderSettings, EMPTY_RESULT_HINT,
};
