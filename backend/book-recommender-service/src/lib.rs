pub mod artifacts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod views;

use actix_web::web;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{LookupError, LookupOutcome, NeighborIndex, Recommender, RecommenderSettings};
pub use state::AppState;

/// Registers every page, API and health route. `/metrics` and middleware are
/// left to the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::health_check)
        .service(handlers::liveness)
        .service(handlers::readiness)
        .service(handlers::home_page)
        .service(handlers::book_detail)
        .service(handlers::recommender_page)
        .service(handlers::about_page)
        .service(handlers::get_popular)
        .service(handlers::get_popular_book)
        .service(handlers::get_recommendations)
        .service(handlers::get_model_info);
}
