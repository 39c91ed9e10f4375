use super::{cover, escape, notice, NoticeLevel};
use crate::models::Recommendation;
use crate::services::{LookupOutcome, EMPTY_RESULT_HINT};
use std::fmt::Write;

pub fn form(title: &str) -> String {
    format!(
        r#"<h3>Get Book Recommendations</h3>
<form method="get" action="/recommender">
    <label for="title">Enter a book title to get recommendations</label><br>
    <input id="title" name="title" type="text" size="60" value="{}">
    <button class="button" type="submit">Submit</button>
</form>"#,
        escape(title)
    )
}

/// Form plus the outcome of a lookup, if one was submitted.
pub fn page(title: &str, outcome: Option<&LookupOutcome>) -> String {
    let mut html = form(title);
    if let Some(outcome) = outcome {
        html.push_str(&results(outcome));
    }
    html
}

pub fn results(outcome: &LookupOutcome) -> String {
    let mut html = String::new();

    if let Some(message) = &outcome.notice {
        html.push_str(&notice(NoticeLevel::Warning, message));
    }

    if outcome.results.is_empty() {
        let _ = write!(html, "<p>{}</p>", EMPTY_RESULT_HINT);
        return html;
    }

    html.push_str("<h3>Recommended Books</h3>");
    html.push_str(r#"<div class="grid" style="grid-template-columns: repeat(5, 1fr);">"#);
    for recommendation in &outcome.results {
        html.push_str(&card(recommendation));
    }
    html.push_str("</div>");
    html
}

fn card(recommendation: &Recommendation) -> String {
    let book = &recommendation.book;
    let year = book
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        r#"<div class="card">{cover}<p>{title}</p>
<p><strong>Author:</strong> {author}</p>
<p><strong>Publisher:</strong> {publisher}</p>
<p><strong>Year:</strong> {year}</p></div>"#,
        cover = cover(book.img_l.as_deref(), None),
        title = escape(&book.title),
        author = escape(&book.author),
        publisher = escape(&book.publisher),
        year = year,
    )
}
