pub mod api;
pub mod health;
pub mod pages;

pub use api::{get_model_info, get_popular, get_popular_book, get_recommendations};
pub use health::{health_check, liveness, readiness};
pub use pages::{about_page, book_detail, home_page, recommender_page};
