use super::{cover, escape, notice, NoticeLevel};
use crate::artifacts::{PopularBooks, PopularPage, PopularSummary};
use crate::models::PopularBook;
use std::fmt::Write;

/// Grid of popular book cards with pager, followed by the table and summary.
pub fn browse(books: &PopularBooks, page: &PopularPage<'_>, columns: usize) -> String {
    let mut html = String::new();
    html.push_str(&grid(page, columns));
    html.push_str(&pager(page));
    html.push_str(&table(books.all()));
    html.push_str(&summary(&books.summary()));
    html
}

fn grid(page: &PopularPage<'_>, columns: usize) -> String {
    let columns = columns.max(1);
    let mut html = String::new();

    for row in page.entries.chunks(columns) {
        let _ = write!(
            html,
            r#"<div class="grid" style="grid-template-columns: repeat({columns}, 1fr);">"#
        );
        for (position, book) in row {
            let _ = write!(
                html,
                r#"<div class="card"><a class="button" href="/books/{position}?page={page}">Detail</a>{cover}</div>"#,
                position = position,
                page = page.page,
                cover = cover(book.img_l.as_deref(), Some(&book.title)),
            );
        }
        html.push_str("</div>");
    }

    html
}

fn pager(page: &PopularPage<'_>) -> String {
    if page.total_pages <= 1 {
        return String::new();
    }

    let mut html = String::from(r#"<div class="pager">"#);
    if page.page > 1 {
        let _ = write!(html, r#"<a href="/?page={}">&laquo; Previous</a> "#, page.page - 1);
    }
    let _ = write!(html, "Page {} of {}", page.page, page.total_pages);
    if page.page < page.total_pages {
        let _ = write!(html, r#" <a href="/?page={}">Next &raquo;</a>"#, page.page + 1);
    }
    html.push_str("</div>");
    html
}

fn table(books: &[PopularBook]) -> String {
    let mut html = String::from(
        "<h3>Detailed View of Popular Books</h3>\
         <table><thead><tr><th>#</th><th>Title</th><th>Author</th><th>Votes</th><th>Rating</th></tr></thead><tbody>",
    );
    for (position, book) in books.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
            position,
            escape(&book.title),
            escape(&book.author),
            book.num_ratings,
            book.avg_rating
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn summary(summary: &PopularSummary) -> String {
    let mut html = format!("<h3>Summary</h3><p>Total Books: {}</p>", summary.total);
    if let Some(average) = summary.average_rating {
        let _ = write!(
            html,
            "<p>Average Rating Across All Books: {:.2}</p>",
            average
        );
    }
    html
}

/// Expanded view of one popular book.
pub fn detail(book: &PopularBook, back_page: usize) -> String {
    format!(
        r#"<div class="detail">{cover}
<p><strong>Author:</strong> {author}</p>
<p><strong>Votes:</strong> {votes}</p>
<p><strong>Rating:</strong> {rating:.2}</p>
<a class="button" href="/?page={back_page}">Go Back</a></div>"#,
        cover = cover(book.img_l.as_deref(), Some(&book.title)),
        author = escape(&book.author),
        votes = book.num_ratings,
        rating = book.avg_rating,
        back_page = back_page,
    )
}

/// Detail view in place of the grid; the table and summary stay below it.
pub fn expanded(books: &PopularBooks, book: &PopularBook, back_page: usize) -> String {
    let mut html = detail(book, back_page);
    html.push_str(&table(books.all()));
    html.push_str(&summary(&books.summary()));
    html
}

pub fn detail_missing(position: usize) -> String {
    format!(
        r#"{}<a class="button" href="/">Go Back</a>"#,
        notice(
            NoticeLevel::Warning,
            &format!("No popular book at position {position}.")
        )
    )
}
