use serde::{Deserialize, Serialize};

use crate::predictor::Regressor;
use crate::{Matrix, Vector};

/// Ordinary least squares model restored from fitted parameters.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    pub coefficients: Vector,
    pub intercept: f64,
}

/// On-disk form of a fitted `LinearRegression`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearRegressionParams {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new(coefficients: Vector, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn from_params(params: LinearRegressionParams) -> Result<Self, String> {
        if params.coefficients.is_empty() {
            return Err("Linear model has no coefficients".to_string());
        }

        if params.coefficients.iter().any(|c| !c.is_finite()) || !params.intercept.is_finite() {
            return Err("Linear model parameters must be finite".to_string());
        }

        Ok(Self::new(Vector::from(params.coefficients), params.intercept))
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector, String> {
        if x.ncols() != self.coefficients.len() {
            return Err(format!(
                "Number of features in X ({}) doesn't match training data ({})",
                x.ncols(),
                self.coefficients.len()
            ));
        }

        let predictions = x.dot(&self.coefficients) + self.intercept;
        Ok(predictions)
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: &Matrix) -> Result<Vector, String> {
        LinearRegression::predict(self, x)
    }
}
