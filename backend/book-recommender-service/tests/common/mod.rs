//! Artifact fixtures written to a temporary directory.

#![allow(dead_code)]

use book_recommender::artifacts::{ArtifactPaths, LoadedArtifacts};
use book_recommender::config::ViewSettings;
use book_recommender::{AppState, RecommenderSettings};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SORCERERS_STONE: &str = "Harry Potter and the Sorcerer's Stone (Harry Potter (Paperback))";
pub const SILMARILLION: &str = "The Silmarillion";

pub struct Fixture {
    // keeps the files alive for the duration of the test
    _dir: TempDir,
    pub paths: ArtifactPaths,
}

fn book(isbn: &str, title: &str, author: &str, publisher: &str, year: Value) -> Value {
    json!({
        "isbn": isbn,
        "book_title": title,
        "book_author": author,
        "year_of_publication": year,
        "publisher": publisher,
        "img_s": format!("http://images.amazon.com/images/P/{isbn}.01.THUMBZZZ.jpg"),
        "img_m": format!("http://images.amazon.com/images/P/{isbn}.01.MZZZZZZZ.jpg"),
        "img_l": format!("http://images.amazon.com/images/P/{isbn}.01.LZZZZZZZ.jpg"),
    })
}

pub fn books() -> Value {
    json!([
        book("059035342X", SORCERERS_STONE, "J. K. Rowling", "Arthur A. Levine Books", json!(1999)),
        book("0439064872", "Harry Potter and the Chamber of Secrets (Book 2)", "J. K. Rowling", "Scholastic", json!(2000.0)),
        book("0439136350", "Harry Potter and the Prisoner of Azkaban (Book 3)", "J. K. Rowling", "Scholastic", json!("2001")),
        book("0385504209", "The Da Vinci Code", "Dan Brown", "Doubleday", json!(2003)),
        book("0671027360", "Angels & Demons", "Dan Brown", "Pocket Star", json!(2001)),
        book("0345339681", "The Hobbit : The Enchanting Prelude to The Lord of the Rings", "J.R.R. TOLKIEN", "Del Rey", json!(1986)),
        book("0312995423", "Digital Fortress : A Thriller", "Dan Brown", "St. Martin's Press", json!(2003)),
        book("0345325818", SILMARILLION, "J.R.R. TOLKIEN", "Del Rey", json!(0)),
    ])
}

pub fn popular_books() -> Value {
    let entries: Vec<Value> = [
        ("0971880107", "Wild Animus", "Rich Shapero", 2502, 1.019584),
        ("0316666343", "The Lovely Bones: A Novel", "Alice Sebold", 1295, 4.468726),
        ("0385504209", "The Da Vinci Code", "Dan Brown", 883, 4.642129),
        ("0060928336", "Divine Secrets of the Ya-Ya Sisterhood: A Novel", "Rebecca Wells", 732, 3.448087),
        ("0312195516", "The Red Tent (Bestselling Backlist)", "Anita Diamant", 723, 4.334716),
    ]
    .iter()
    .map(|(isbn, title, author, votes, rating)| {
        json!({
            "isbn": isbn,
            "book_title": title,
            "book_author": author,
            "img_l": format!("http://images.amazon.com/images/P/{isbn}.01.LZZZZZZZ.jpg"),
            "num_ratings": votes,
            "avg_rating": rating,
        })
    })
    .collect();
    Value::Array(entries)
}

pub fn ratings() -> Value {
    json!({
        "columns": [254, 2276, 2766, 2977],
        "index": ["059035342X", "0439064872", "0439136350", "0385504209", "0671027360", "0345339681", "0312995423"],
        "data": [
            [5.0, 4.0, null, null],
            [5.0, 4.0, null, 1.0],
            [4.0, 5.0, null, null],
            [null, null, 5.0, 4.0],
            [null, null, 4.0, 5.0],
            [1.0, null, null, null],
            [null, 1.0, 5.0, 5.0]
        ]
    })
}

pub fn model() -> Value {
    json!({
        "metric": "cosine",
        "algorithm": "brute",
        "n_neighbors": 5,
        "n_samples_fit": 7,
        "n_features_in": 4
    })
}

fn write(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

impl Fixture {
    pub fn new() -> Self {
        Self::with(|_| {})
    }

    /// Writes every artifact, then lets `customize` overwrite or remove files.
    pub fn with(customize: impl FnOnce(&ArtifactPaths)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths {
            popular_books: dir.path().join("top_20_books.json"),
            books: dir.path().join("top_books.json"),
            model: dir.path().join("model_knn.json"),
            ratings: dir.path().join("ratings_pivot.json"),
        };

        write(&paths.popular_books, &popular_books());
        write(&paths.books, &books());
        write(&paths.model, &model());
        write(&paths.ratings, &ratings());
        customize(&paths);

        Self { _dir: dir, paths }
    }

    pub fn state(&self) -> AppState {
        AppState::build(
            LoadedArtifacts::load(&self.paths),
            RecommenderSettings::default(),
            ViewSettings {
                page_size: 20,
                grid_columns: 4,
            },
        )
    }
}

pub fn overwrite(path: &Path, value: Value) {
    write(path, &value);
}
