/// HTML page handlers
///
/// Home, detail, recommender and about views
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use crate::state::AppState;
use crate::views::{self, about, home, notice, recommender, Nav, NoticeLevel};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// GET /
#[get("/")]
pub async fn home_page(
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let body = match &state.popular_books {
        Ok(books) => {
            let page = books.page(query.page, state.views.page_size);
            debug!(page = page.page, total_pages = page.total_pages, "Rendering home grid");
            home::browse(books, &page, state.views.grid_columns)
        }
        Err(failure) => notice(NoticeLevel::Error, &failure.to_string()),
    };

    html(views::layout(Nav::Home, &body))
}

/// GET /books/{index}
/// Expanded view of the popular book at `index`; `?page=` is where "Go Back"
/// returns to.
#[get("/books/{index}")]
pub async fn book_detail(
    path: web::Path<usize>,
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let position = path.into_inner();

    let books = match &state.popular_books {
        Ok(books) => books,
        Err(failure) => {
            let body = notice(NoticeLevel::Error, &failure.to_string());
            return html(views::layout(Nav::Home, &body));
        }
    };

    match books.get(position) {
        Some(book) => html(views::layout(
            Nav::Home,
            &home::expanded(books, book, query.page),
        )),
        None => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(views::layout(Nav::Home, &home::detail_missing(position))),
    }
}

/// GET /recommender
#[get("/recommender")]
pub async fn recommender_page(
    query: web::Query<TitleQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let title = query.title.as_deref().unwrap_or("");

    let body = match &state.recommender {
        Ok(service) => {
            // an empty submission renders the bare form
            let outcome = (!title.trim().is_empty()).then(|| service.lookup(title));
            recommender::page(title, outcome.as_ref())
        }
        Err(failures) => {
            let mut body = recommender::form(title);
            for failure in failures {
                body.push_str(&notice(NoticeLevel::Error, &failure.to_string()));
            }
            body
        }
    };

    html(views::layout(Nav::Recommender, &body))
}

/// GET /about
#[get("/about")]
pub async fn about_page() -> HttpResponse {
    html(views::layout(Nav::About, &about::page()))
}
