use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{EstimatorError, Result};

pub const ROOM_COUNT_COLUMN: &str = "bhk";
pub const BATHROOM_COUNT_COLUMN: &str = "bath";
pub const BALCONY_COUNT_COLUMN: &str = "balcony";
pub const AREA_COLUMN: &str = "new_total_sqft";

/// A categorical input that is one-hot encoded into `{prefix}{value}` columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Location,
    AreaType,
    Availability,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Location, Dimension::AreaType, Dimension::Availability];

    pub fn prefix(self) -> &'static str {
        match self {
            Dimension::Location => "site_location_",
            Dimension::AreaType => "area_type_",
            Dimension::Availability => "availability_",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The ordered column list a trained model expects, with column positions
/// resolved once up front.
#[derive(Clone, Debug)]
pub struct FeatureSchema {
    columns: Arc<[String]>,
    pub(crate) room_count: usize,
    pub(crate) bathroom_count: usize,
    pub(crate) balcony_count: usize,
    pub(crate) area: usize,
    indicators: [HashMap<String, usize>; 3],
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(EstimatorError::invalid_schema(format!(
                "duplicate column '{}'",
                duplicate
            )));
        }

        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| EstimatorError::invalid_schema(format!("missing numeric column '{}'", name)))
        };

        let room_count = position(ROOM_COUNT_COLUMN)?;
        let bathroom_count = position(BATHROOM_COUNT_COLUMN)?;
        let balcony_count = position(BALCONY_COUNT_COLUMN)?;
        let area = position(AREA_COLUMN)?;

        let mut indicators: [HashMap<String, usize>; 3] = Default::default();
        for (i, column) in columns.iter().enumerate() {
            for dimension in Dimension::ALL {
                if let Some(value) = column.strip_prefix(dimension.prefix()) {
                    indicators[dimension.index()].insert(value.to_string(), i);
                }
            }
        }

        Ok(Self {
            columns: columns.into(),
            room_count,
            bathroom_count,
            balcony_count,
            area,
            indicators,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn shared_columns(&self) -> Arc<[String]> {
        Arc::clone(&self.columns)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column index of the indicator for `value`, or `None` if the model never saw it.
    pub fn indicator(&self, dimension: Dimension, value: &str) -> Option<usize> {
        self.indicators[dimension.index()].get(value).copied()
    }

    /// Number of known categories for a dimension.
    pub fn n_categories(&self, dimension: Dimension) -> usize {
        self.indicators[dimension.index()].len()
    }
}

/// Reads the model column list, a JSON array of strings.
pub fn load_columns(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| EstimatorError::startup("model columns", path, e.to_string()))?;
    let columns: Vec<String> =
        serde_json::from_str(&raw).map_err(|e| EstimatorError::startup("model columns", path, e.to_string()))?;

    tracing::debug!(path = %path.display(), n_columns = columns.len(), "loaded model columns");
    Ok(columns)
}
