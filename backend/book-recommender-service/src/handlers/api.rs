/// JSON API Handlers
///
/// Machine-readable access to the same data the pages render
use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::artifacts::{ArtifactFailure, PopularSummary};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{Book, PopularBook};
use crate::services::{ModelInfo, Recommender};
use crate::state::AppState;

/// Query parameters for GET /api/v1/popular
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_page")]
    pub page: usize,

    /// Entries per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PopularEntry<'a> {
    pub position: usize,
    #[serde(flatten)]
    pub book: &'a PopularBook,
}

#[derive(Debug, Serialize)]
pub struct PopularResponse<'a> {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub books: Vec<PopularEntry<'a>>,
    pub summary: PopularSummary,
}

/// Recommendation card fields; only the large cover is shown for results.
#[derive(Debug, Serialize)]
pub struct RecommendedBook<'a> {
    pub isbn: &'a str,
    pub book_title: &'a str,
    pub book_author: &'a str,
    pub publisher: &'a str,
    pub year_of_publication: Option<i32>,
    pub img_l: Option<&'a str>,
    pub distance: f64,
}

impl<'a> RecommendedBook<'a> {
    fn new(book: &'a Book, distance: f64) -> Self {
        Self {
            isbn: &book.isbn,
            book_title: &book.title,
            book_author: &book.author,
            publisher: &book.publisher,
            year_of_publication: book.year,
            img_l: book.img_l.as_deref(),
            distance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse<'a> {
    pub query: &'a str,
    pub results: Vec<RecommendedBook<'a>>,
    pub count: usize,
    /// Why `results` is empty, when it is
    pub notice: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    #[serde(flatten)]
    pub info: ModelInfo,
    pub loaded_at: String,
}

fn unavailable(failure: &ArtifactFailure) -> AppError {
    AppError::ServiceUnavailable(failure.to_string())
}

fn recommender(state: &AppState) -> Result<&Recommender> {
    state.recommender.as_deref().map_err(|failures| {
        AppError::ServiceUnavailable(
            failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    })
}

/// GET /api/v1/popular
#[get("/api/v1/popular")]
pub async fn get_popular(
    query: web::Query<PopularQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let books = state.popular_books.as_ref().map_err(unavailable)?;
    let page_size = query.page_size.clamp(1, 100);
    let page = books.page(query.page, page_size);

    debug!(page = page.page, page_size, "Listing popular books");

    Ok(HttpResponse::Ok().json(PopularResponse {
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        books: page
            .entries
            .iter()
            .map(|&(position, book)| PopularEntry { position, book })
            .collect(),
        summary: books.summary(),
    }))
}

/// GET /api/v1/popular/{index}
#[get("/api/v1/popular/{index}")]
pub async fn get_popular_book(
    path: web::Path<usize>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let position = path.into_inner();
    let books = state.popular_books.as_ref().map_err(unavailable)?;

    let book = books
        .get(position)
        .ok_or_else(|| AppError::NotFound(format!("popular book {}", position)))?;

    Ok(HttpResponse::Ok().json(PopularEntry { position, book }))
}

/// GET /api/v1/recommendations?title=
/// Lookup failures answer 200 with an empty list and a notice
#[get("/api/v1/recommendations")]
pub async fn get_recommendations(
    query: web::Query<RecommendationQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if query.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }

    let service = recommender(&state).map_err(|err| {
        metrics::record_lookup("unavailable");
        warn!(error = %err, "Recommendation requested while recommender is offline");
        err
    })?;

    let outcome = service.lookup(&query.title);

    Ok(HttpResponse::Ok().json(RecommendationResponse {
        query: &outcome.query,
        results: outcome
            .results
            .iter()
            .map(|rec| RecommendedBook::new(&rec.book, rec.distance))
            .collect(),
        count: outcome.results.len(),
        notice: outcome.notice.as_deref(),
    }))
}

/// GET /api/v1/model-info
#[get("/api/v1/model-info")]
pub async fn get_model_info(state: web::Data<AppState>) -> Result<HttpResponse> {
    let service = recommender(&state)?;

    Ok(HttpResponse::Ok().json(ModelInfoResponse {
        info: service.model_info(),
        loaded_at: state.loaded_at.to_rfc3339(),
    }))
}
