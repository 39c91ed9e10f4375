use super::{read_json, ArtifactError, Result};
use crate::models::FrameKey;
use ndarray::{Array2, ArrayView1};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Book x user ratings pivot. Absent ratings are stored as 0.
#[derive(Debug, Clone)]
pub struct RatingsMatrix {
    isbns: Vec<String>,
    users: Vec<String>,
    row_by_isbn: HashMap<String, usize>,
    values: Array2<f64>,
}

/// pandas `DataFrame.to_json(orient="split")`
#[derive(Deserialize)]
struct SplitFrame {
    index: Vec<FrameKey>,
    columns: Vec<FrameKey>,
    data: Vec<Vec<Option<f64>>>,
}

impl RatingsMatrix {
    pub fn load(path: &Path) -> Result<Self> {
        let frame: SplitFrame = read_json(path)?;
        Self::from_frame(frame)
    }

    pub fn from_split_json(data: &[u8]) -> Result<Self> {
        let frame: SplitFrame = serde_json::from_slice(data)
            .map_err(|e| ArtifactError::Malformed(format!("ratings frame: {e}")))?;
        Self::from_frame(frame)
    }

    fn from_frame(frame: SplitFrame) -> Result<Self> {
        let isbns: Vec<String> = frame.index.into_iter().map(FrameKey::into_string).collect();
        let users: Vec<String> = frame.columns.into_iter().map(FrameKey::into_string).collect();

        if frame.data.len() != isbns.len() {
            return Err(ArtifactError::Malformed(format!(
                "ratings frame has {} index entries but {} data rows",
                isbns.len(),
                frame.data.len()
            )));
        }

        let mut values = Array2::<f64>::zeros((isbns.len(), users.len()));
        for (row, cells) in frame.data.into_iter().enumerate() {
            if cells.len() != users.len() {
                return Err(ArtifactError::Malformed(format!(
                    "ratings row {} has {} cells, expected {}",
                    row,
                    cells.len(),
                    users.len()
                )));
            }
            for (col, cell) in cells.into_iter().enumerate() {
                values[[row, col]] = cell.filter(|v| v.is_finite()).unwrap_or(0.0);
            }
        }

        Self::new(isbns, users, values)
    }

    pub fn new(isbns: Vec<String>, users: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.dim() != (isbns.len(), users.len()) {
            return Err(ArtifactError::Malformed(format!(
                "ratings shape {:?} does not match {} books x {} users",
                values.dim(),
                isbns.len(),
                users.len()
            )));
        }

        let mut row_by_isbn = HashMap::with_capacity(isbns.len());
        for (row, isbn) in isbns.iter().enumerate() {
            if row_by_isbn.insert(isbn.clone(), row).is_some() {
                return Err(ArtifactError::Malformed(format!(
                    "duplicate ISBN {isbn} in ratings index"
                )));
            }
        }

        Ok(Self {
            isbns,
            users,
            row_by_isbn,
            values,
        })
    }

    pub fn row_of(&self, isbn: &str) -> Option<usize> {
        self.row_by_isbn.get(isbn).copied()
    }

    pub fn isbn_at(&self, row: usize) -> Option<&str> {
        self.isbns.get(row).map(String::as_str)
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_books(&self) -> usize {
        self.isbns.len()
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }
}
