//! House price estimation from listing attributes, with comparable-location
//! recommendations by price per area.

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod config;
pub mod dataset;
pub mod ensemble;
pub mod error;
pub mod estimator;
pub mod linear_model;
pub mod maps;
pub mod predictor;
pub mod preprocessing;
pub mod recommend;

pub use config::Config;
pub use dataset::{load_dataset, DatasetCache, Listing, ListingTable, LoadStats};
pub use ensemble::{DecisionTreeRegressor, RandomForestRegressor};
pub use error::{EstimatorError, Result};
pub use estimator::{Estimate, Estimator, InputOptions};
pub use linear_model::LinearRegression;
pub use predictor::{load_model, ModelArtifact, PredictionResult, PricePredictor, Regressor};
pub use preprocessing::{encode, FeatureSchema, FeatureVector, HouseFeatures};
pub use recommend::{recommend, recommend_with, RecommendationSet, RecommenderConfig};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
