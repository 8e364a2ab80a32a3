use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ensemble::{RandomForestParams, RandomForestRegressor};
use crate::error::{EstimatorError, Result};
use crate::linear_model::{LinearRegression, LinearRegressionParams};
use crate::preprocessing::{FeatureSchema, FeatureVector};
use crate::{Matrix, Vector};

/// A fitted model that maps feature rows to prices.
pub trait Regressor: fmt::Debug + Send + Sync {
    fn n_features(&self) -> usize;

    fn predict(&self, x: &Matrix) -> std::result::Result<Vector, String>;
}

/// Serialized model artifact, tagged by `kind`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressionParams),
    RandomForest(RandomForestParams),
}

impl ModelArtifact {
    pub fn into_regressor(self) -> std::result::Result<Box<dyn Regressor>, String> {
        let model: Box<dyn Regressor> = match self {
            ModelArtifact::Linear(params) => Box::new(LinearRegression::from_params(params)?),
            ModelArtifact::RandomForest(params) => Box::new(RandomForestRegressor::from_params(params)?),
        };
        Ok(model)
    }
}

/// Reads a model artifact from a JSON file.
pub fn load_model(path: impl AsRef<Path>) -> Result<Box<dyn Regressor>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| EstimatorError::startup("model", path, e.to_string()))?;
    let artifact: ModelArtifact =
        serde_json::from_str(&raw).map_err(|e| EstimatorError::startup("model", path, e.to_string()))?;
    let model = artifact
        .into_regressor()
        .map_err(|e| EstimatorError::startup("model", path, e))?;

    tracing::debug!(path = %path.display(), n_features = model.n_features(), "loaded model");
    Ok(model)
}

/// Predicted sale price in lakhs, rounded to 2 decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionResult {
    pub price: f64,
}

impl PredictionResult {
    pub fn in_base_units(&self) -> f64 {
        self.price * crate::recommend::LAKH
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹ {:.2} Lakhs", self.price)
    }
}

/// A model paired with the column list it was trained on.
#[derive(Debug)]
pub struct PricePredictor {
    model: Box<dyn Regressor>,
    columns: Arc<[String]>,
}

impl PricePredictor {
    pub fn new(model: Box<dyn Regressor>, schema: &FeatureSchema) -> Result<Self> {
        if model.n_features() != schema.len() {
            return Err(EstimatorError::invalid_schema(format!(
                "model expects {} features but the column list has {}",
                model.n_features(),
                schema.len()
            )));
        }

        Ok(Self {
            model,
            columns: schema.shared_columns(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Runs the model on one encoded row.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        if !features.shares_columns(&self.columns) && features.columns() != &*self.columns {
            return Err(EstimatorError::schema_mismatch(format!(
                "got {} columns, model expects {}",
                features.len(),
                self.columns.len()
            )));
        }

        let predictions = self
            .model
            .predict(&features.to_matrix())
            .map_err(EstimatorError::schema_mismatch)?;
        let price = predictions
            .first()
            .copied()
            .ok_or_else(|| EstimatorError::schema_mismatch("model returned no prediction"))?;

        Ok(PredictionResult {
            price: round_to(price, 2),
        })
    }
}

/// Rounds to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{encode, HouseFeatures};
    use ndarray::array;

    fn schema() -> FeatureSchema {
        let columns = ["bhk", "bath", "balcony", "new_total_sqft", "site_location_Aundh"];
        FeatureSchema::new(columns.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn features() -> HouseFeatures {
        HouseFeatures {
            location: "Aundh".to_string(),
            room_count: 2,
            bathroom_count: 2,
            balcony_count: 1,
            area: 1000.0,
            area_type: "Plot  Area".to_string(),
            availability: "Ready To Move".to_string(),
        }
    }

    fn linear(coefficients: Vector, intercept: f64) -> Box<dyn Regressor> {
        Box::new(LinearRegression::new(coefficients, intercept))
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(12.344, 2), 12.34);
        assert_eq!(round_to(-1.005, 0), -1.0);
        assert_eq!(round_to(50.0, 2), 50.0);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(52.625, 2), 52.62);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
    }

    #[test]
    fn test_predict_rounds_exact_tie_to_even() {
        let schema = schema();
        let model = linear(array![0.0, 0.0, 0.0, 0.0, 0.0], 52.625);
        let predictor = PricePredictor::new(model, &schema).unwrap();

        let result = predictor.predict(&encode(&features(), &schema)).unwrap();

        assert_eq!(result.price, 52.62);
        assert_eq!(result.to_string(), "₹ 52.62 Lakhs");
    }

    #[test]
    fn test_predict_rounds_to_two_decimals() {
        let schema = schema();
        let model = linear(array![1.111, 0.0, 0.0, 0.012345, 7.777], 0.004);
        let predictor = PricePredictor::new(model, &schema).unwrap();

        let result = predictor.predict(&encode(&features(), &schema)).unwrap();

        // 2.222 + 12.345 + 7.777 + 0.004
        assert_eq!(result.price, 22.35);
        assert_eq!((result.price * 100.0).round() / 100.0, result.price);
    }

    #[test]
    fn test_predictor_rejects_width_mismatch() {
        let schema = schema();
        let err = PricePredictor::new(linear(array![1.0, 2.0], 0.0), &schema).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_predict_rejects_foreign_columns() {
        let schema = schema();
        let predictor = PricePredictor::new(linear(Vector::zeros(5), 1.0), &schema).unwrap();

        let other = FeatureVector::new(
            ["bhk", "bath", "balcony", "new_total_sqft", "site_location_Baner"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Vector::zeros(5),
        )
        .unwrap();
        let err = predictor.predict(&other).unwrap_err();
        assert!(matches!(err, EstimatorError::SchemaMismatch(_)));
        assert!(!err.is_fatal());

        let short = FeatureVector::new(vec!["bhk".to_string()], Vector::zeros(1)).unwrap();
        assert!(predictor.predict(&short).is_err());
    }

    #[test]
    fn test_predict_accepts_equal_columns() {
        let schema = schema();
        let predictor = PricePredictor::new(linear(Vector::ones(5), 0.0), &schema).unwrap();

        let copy = FeatureVector::new(schema.columns().to_vec(), array![1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(predictor.predict(&copy).unwrap().price, 5.0);
    }

    #[test]
    fn test_artifact_kinds() {
        let linear: ModelArtifact =
            serde_json::from_str(r#"{"kind": "linear", "coefficients": [1.0, 2.0], "intercept": 0.5}"#).unwrap();
        assert_eq!(linear.into_regressor().unwrap().n_features(), 2);

        let forest: ModelArtifact = serde_json::from_str(
            r#"{"kind": "random_forest", "n_features": 3, "trees": [{"nodes": [{"value": 42.0}]}]}"#,
        )
        .unwrap();
        let forest = forest.into_regressor().unwrap();
        assert_eq!(forest.n_features(), 3);
        assert_eq!(forest.predict(&array![[0.0, 0.0, 0.0]]).unwrap()[0], 42.0);
    }

    #[test]
    fn test_prediction_display() {
        let result = PredictionResult { price: 52.5 };
        assert_eq!(result.to_string(), "₹ 52.50 Lakhs");
        assert_eq!(result.in_base_units(), 5_250_000.0);
    }

    #[test]
    fn test_load_model_missing_file() {
        let err = load_model("/nonexistent/rf_model.json").unwrap_err();
        assert!(matches!(err, EstimatorError::Startup { artifact: "model", .. }));
    }
}
