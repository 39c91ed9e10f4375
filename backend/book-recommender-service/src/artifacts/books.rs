use super::{read_json, Result};
use crate::models::Book;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Book metadata table with a title lookup.
#[derive(Debug, Clone)]
pub struct BookCatalog {
    books: Vec<Book>,
    /// title -> position of its first occurrence
    by_title: HashMap<String, usize>,
}

impl BookCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let books: Vec<Book> = read_json(path)?;
        Ok(Self::from_books(books))
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        let mut by_title = HashMap::with_capacity(books.len());
        for (position, book) in books.iter().enumerate() {
            by_title.entry(book.title.trim().to_string()).or_insert(position);
        }

        Self { books, by_title }
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Book> {
        self.by_title.get(title).map(|&position| &self.books[position])
    }

    /// All records whose ISBN is in `isbns`, in table order.
    ///
    /// Duplicate rows for the same ISBN are all returned, so callers can
    /// detect a table that does not line up one-to-one with the matrix.
    pub fn records_for_isbns(&self, isbns: &HashSet<&str>) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| isbns.contains(book.isbn.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: String::new(),
            publisher: String::new(),
            year: None,
            img_s: None,
            img_m: None,
            img_l: None,
            num_ratings: 0,
            avg_rating: None,
        }
    }

    #[test]
    fn test_first_title_occurrence_wins() {
        let catalog = BookCatalog::from_books(vec![
            book("0440234743", "The Testament"),
            book("0385493800", "The Testament"),
        ]);

        assert_eq!(
            catalog.find_by_title("The Testament").map(|b| b.isbn.as_str()),
            Some("0440234743")
        );
        assert!(catalog.find_by_title("the testament").is_none());
    }

    #[test]
    fn test_records_for_isbns_keeps_duplicates() {
        let catalog = BookCatalog::from_books(vec![
            book("1", "One"),
            book("2", "Two"),
            book("2", "Two (Reissue)"),
            book("3", "Three"),
        ]);

        let wanted: HashSet<&str> = ["2", "3"].into_iter().collect();
        let titles: Vec<&str> = catalog
            .records_for_isbns(&wanted)
            .iter()
            .map(|b| b.title.as_str())
            .collect();

        assert_eq!(titles, vec!["Two", "Two (Reissue)", "Three"]);
    }
}
