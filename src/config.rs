use std::path::{Path, PathBuf};

use crate::recommend::RecommenderConfig;

pub const DEFAULT_DATASET_FILE: &str = "Pune_House_Data.csv";
pub const DEFAULT_MODEL_FILE: &str = "rf_model.json";
pub const DEFAULT_COLUMNS_FILE: &str = "model_columns.json";
pub const DEFAULT_CITY: &str = "Pune";

/// Where the estimator finds its artifacts, and how it recommends.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub columns_path: PathBuf,
    /// Appended to map search links.
    pub city: String,
    pub recommender: RecommenderConfig,
}

impl Config {
    /// Default file names resolved against `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            dataset_path: dir.join(DEFAULT_DATASET_FILE),
            model_path: dir.join(DEFAULT_MODEL_FILE),
            columns_path: dir.join(DEFAULT_COLUMNS_FILE),
            ..Self::default()
        }
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn recommender(mut self, recommender: RecommenderConfig) -> Self {
        self.recommender = recommender;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_FILE),
            model_path: PathBuf::from(DEFAULT_MODEL_FILE),
            columns_path: PathBuf::from(DEFAULT_COLUMNS_FILE),
            city: DEFAULT_CITY.to_string(),
            recommender: RecommenderConfig::default(),
        }
    }
}
