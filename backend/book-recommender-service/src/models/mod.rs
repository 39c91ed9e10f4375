use serde::{Deserialize, Deserializer, Serialize};

/// Book metadata row as exported by the training pipeline (`top_books`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    #[serde(deserialize_with = "de_key")]
    pub isbn: String,
    #[serde(rename = "book_title")]
    pub title: String,
    #[serde(rename = "book_author", default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(rename = "year_of_publication", default, deserialize_with = "de_year")]
    pub year: Option<i32>,
    #[serde(default)]
    pub img_s: Option<String>,
    #[serde(default)]
    pub img_m: Option<String>,
    #[serde(default)]
    pub img_l: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub num_ratings: u64,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub avg_rating: Option<f64>,
}

/// Entry of the popularity-ranked list shown on the home page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularBook {
    #[serde(default, deserialize_with = "de_opt_key")]
    pub isbn: Option<String>,
    #[serde(rename = "book_title")]
    pub title: String,
    #[serde(rename = "book_author", default)]
    pub author: String,
    #[serde(default)]
    pub img_s: Option<String>,
    #[serde(default)]
    pub img_m: Option<String>,
    #[serde(default)]
    pub img_l: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub num_ratings: u64,
    #[serde(default, deserialize_with = "de_number")]
    pub avg_rating: f64,
}

/// A similar book together with its distance to the queried book.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub book: Book,
    pub distance: f64,
}

/// pandas writes integers, floats, numeric strings or null depending on the
/// column dtype, so numeric fields accept all of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Int(v) => Some(*v as f64),
            Numeric::Float(v) => Some(*v),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
        .filter(|v: &f64| v.is_finite())
    }
}

/// Identifier that may have been exported as a number.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum FrameKey {
    Text(String),
    Int(i64),
    Float(f64),
}

impl FrameKey {
    pub(crate) fn into_string(self) -> String {
        match self {
            FrameKey::Text(s) => s,
            FrameKey::Int(v) => v.to_string(),
            FrameKey::Float(v) if v.fract() == 0.0 => format!("{}", v as i64),
            FrameKey::Float(v) => v.to_string(),
        }
    }
}

fn de_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(FrameKey::deserialize(deserializer)?.into_string())
}

fn de_opt_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FrameKey>::deserialize(deserializer)?.map(FrameKey::into_string))
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Numeric>::deserialize(deserializer)?.and_then(|n| n.as_f64()))
}

fn de_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_number(deserializer)?.unwrap_or(0.0))
}

fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_number(deserializer)?
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or(0))
}

// Year 0 marks an unknown publication year in the source data.
fn de_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_number(deserializer)?
        .filter(|v| *v >= 1.0)
        .map(|v| v.round() as i32))
}
