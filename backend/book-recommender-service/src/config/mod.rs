use crate::artifacts::ArtifactPaths;
use crate::services::RecommenderSettings;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server config
    pub app_env: String,
    pub http_host: String,
    pub http_port: u16,

    // Observability
    pub log_level: String,
    pub json_logs: bool,

    // Artifacts
    pub popular_books_path: String,
    pub books_path: String,
    pub model_path: String,
    pub ratings_path: String,

    // Recommendation
    pub query_neighbors: usize,
    pub max_recommendations: usize,

    // Home page layout
    pub home_page_size: usize,
    pub grid_columns: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    pub page_size: usize,
    pub grid_columns: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::default())
    }

    /// Defaults overlaid with `environment`; split out so tests can inject a
    /// fixed variable map.
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8501)?
            .set_default("log_level", "info")?
            .set_default("json_logs", false)?
            .set_default("popular_books_path", "./artifacts/top_20_books.json")?
            .set_default("books_path", "./artifacts/top_books.json")?
            .set_default("model_path", "./artifacts/model_knn.json")?
            .set_default("ratings_path", "./artifacts/ratings_pivot.json")?
            .set_default("query_neighbors", 6)?
            .set_default("max_recommendations", 5)?
            .set_default("home_page_size", 20)?
            .set_default("grid_columns", 4)?
            .add_source(environment.separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        // one slot is taken by the queried book itself
        if self.query_neighbors < 2 {
            return Err(anyhow!("Query neighbors must be at least 2"));
        }

        if self.max_recommendations == 0 {
            return Err(anyhow!("Max recommendations must be greater than 0"));
        }

        if self.home_page_size == 0 || self.home_page_size > 200 {
            return Err(anyhow!("Home page size must be between 1 and 200"));
        }

        if self.grid_columns == 0 || self.grid_columns > 12 {
            return Err(anyhow!("Grid columns must be between 1 and 12"));
        }

        for (name, path) in [
            ("popular_books_path", &self.popular_books_path),
            ("books_path", &self.books_path),
            ("model_path", &self.model_path),
            ("ratings_path", &self.ratings_path),
        ] {
            if path.trim().is_empty() {
                return Err(anyhow!("{} is required", name));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            popular_books: PathBuf::from(&self.popular_books_path),
            books: PathBuf::from(&self.books_path),
            model: PathBuf::from(&self.model_path),
            ratings: PathBuf::from(&self.ratings_path),
        }
    }

    pub fn recommender_settings(&self) -> RecommenderSettings {
        RecommenderSettings {
            query_neighbors: self.query_neighbors,
            max_results: self.max_recommendations,
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            page_size: self.home_page_size,
            grid_columns: self.grid_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Config {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_environment(config::Environment::default().source(Some(source))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);

        assert_eq!(config.http_port, 8501);
        assert_eq!(config.query_neighbors, 6);
        assert_eq!(config.max_recommendations, 5);
        assert_eq!(config.grid_columns, 4);
        assert!(!config.json_logs);
        assert_eq!(
            config.artifact_paths().ratings,
            PathBuf::from("./artifacts/ratings_pivot.json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let config = load(&[
            ("HTTP_PORT", "9000"),
            ("JSON_LOGS", "true"),
            ("BOOKS_PATH", "/data/books.json"),
            ("HOME_PAGE_SIZE", "8"),
        ]);

        assert_eq!(config.http_port, 9000);
        assert!(config.json_logs);
        assert_eq!(config.books_path, "/data/books.json");
        assert_eq!(config.view_settings().page_size, 8);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = load(&[]);
        config.query_neighbors = 1;
        assert!(config.validate().is_err());

        let mut config = load(&[]);
        config.grid_columns = 0;
        assert!(config.validate().is_err());

        let mut config = load(&[]);
        config.model_path = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("model_path"));
    }
}
