use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::error::{EstimatorError, Result};
use crate::preprocessing::schema::{Dimension, FeatureSchema};
use crate::{Matrix, Vector};

pub const ROOM_COUNT_RANGE: RangeInclusive<u32> = 1..=10;
pub const BATHROOM_COUNT_RANGE: RangeInclusive<u32> = 1..=10;
pub const BALCONY_COUNT_RANGE: RangeInclusive<u32> = 0..=5;
pub const AREA_RANGE: RangeInclusive<f64> = 100.0..=20000.0;

/// Raw attributes of the house being priced.
#[derive(Clone, Debug, PartialEq)]
pub struct HouseFeatures {
    pub location: String,
    pub room_count: u32,
    pub bathroom_count: u32,
    pub balcony_count: u32,
    /// Total area in square feet.
    pub area: f64,
    pub area_type: String,
    pub availability: String,
}

impl HouseFeatures {
    /// Checks the numeric inputs against their accepted ranges.
    pub fn validate(&self) -> Result<()> {
        check_range("room count", self.room_count, &ROOM_COUNT_RANGE)?;
        check_range("bathroom count", self.bathroom_count, &BATHROOM_COUNT_RANGE)?;
        check_range("balcony count", self.balcony_count, &BALCONY_COUNT_RANGE)?;

        if !AREA_RANGE.contains(&self.area) {
            return Err(EstimatorError::invalid_input(format!(
                "area {} is outside {}..={}",
                self.area,
                AREA_RANGE.start(),
                AREA_RANGE.end()
            )));
        }

        Ok(())
    }

    pub fn category(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Location => &self.location,
            Dimension::AreaType => &self.area_type,
            Dimension::Availability => &self.availability,
        }
    }
}

fn check_range(name: &str, value: u32, range: &RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(EstimatorError::invalid_input(format!(
            "{} {} is outside {}..={}",
            name,
            value,
            range.start(),
            range.end()
        )))
    }
}

/// A single encoded row, aligned column-for-column with a `FeatureSchema`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    columns: Arc<[String]>,
    values: Vector,
}

impl FeatureVector {
    pub fn new(columns: Vec<String>, values: Vector) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(EstimatorError::schema_mismatch(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            )));
        }

        Ok(Self {
            columns: columns.into(),
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn shares_columns(&self, columns: &Arc<[String]>) -> bool {
        Arc::ptr_eq(&self.columns, columns)
    }

    pub fn values(&self) -> &Vector {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// The row as a `1 x n` matrix, ready for `predict`.
    pub fn to_matrix(&self) -> Matrix {
        self.values.clone().insert_axis(ndarray::Axis(0))
    }
}

/// Builds the model input row for `features`.
///
/// A categorical value that has no indicator column in the schema leaves
/// every indicator of that dimension at 0.
pub fn encode(features: &HouseFeatures, schema: &FeatureSchema) -> FeatureVector {
    let mut values = Vector::zeros(schema.len());

    values[schema.room_count] = features.room_count as f64;
    values[schema.bathroom_count] = features.bathroom_count as f64;
    values[schema.balcony_count] = features.balcony_count as f64;
    values[schema.area] = features.area;

    for dimension in Dimension::ALL {
        let value = features.category(dimension);
        match schema.indicator(dimension, value) {
            Some(index) => values[index] = 1.0,
            None => tracing::debug!(?dimension, value, "no indicator column for category"),
        }
    }

    FeatureVector {
        columns: schema.shared_columns(),
        values,
    }
}
