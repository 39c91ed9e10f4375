use super::{read_json, Result};
use crate::models::PopularBook;
use serde::Serialize;
use std::path::Path;

/// Popularity-ranked books for the home grid.
#[derive(Debug, Clone)]
pub struct PopularBooks {
    books: Vec<PopularBook>,
}

#[derive(Debug)]
pub struct PopularPage<'a> {
    /// 1-based, clamped to the available range
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total: usize,
    /// (position in the full list, book)
    pub entries: Vec<(usize, &'a PopularBook)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularSummary {
    pub total: usize,
    pub average_rating: Option<f64>,
}

impl PopularBooks {
    pub fn load(path: &Path) -> Result<Self> {
        let books: Vec<PopularBook> = read_json(path)?;
        Ok(Self::new(books))
    }

    pub fn new(books: Vec<PopularBook>) -> Self {
        Self { books }
    }

    pub fn get(&self, position: usize) -> Option<&PopularBook> {
        self.books.get(position)
    }

    pub fn all(&self) -> &[PopularBook] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn page(&self, page: usize, page_size: usize) -> PopularPage<'_> {
        let page_size = page_size.max(1);
        let total = self.books.len();
        let total_pages = total.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);

        let entries = self
            .books
            .iter()
            .enumerate()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        PopularPage {
            page,
            page_size,
            total_pages,
            total,
            entries,
        }
    }

    pub fn summary(&self) -> PopularSummary {
        let average_rating = if self.books.is_empty() {
            None
        } else {
            let sum: f64 = self.books.iter().map(|b| b.avg_rating).sum();
            Some(sum / self.books.len() as f64)
        };

        PopularSummary {
            total: self.books.len(),
            average_rating,
        }
    }
}
