use std::sync::Arc;

use crate::config::Config;
use crate::dataset::{DatasetCache, ListingTable};
use crate::error::{EstimatorError, Result};
use crate::maps::map_search_url;
use crate::predictor::{load_model, PredictionResult, PricePredictor, Regressor};
use crate::preprocessing::{encode, load_columns, FeatureSchema, HouseFeatures};
use crate::recommend::{recommend_with, RecommendationSet, RecommenderConfig};

/// Everything produced for one pricing request.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    pub prediction: PredictionResult,
    pub recommendations: RecommendationSet,
    pub map_url: String,
}

/// Choice lists for the categorical inputs, sorted.
#[derive(Clone, Copy, Debug)]
pub struct InputOptions<'a> {
    pub locations: &'a [String],
    pub area_types: &'a [String],
    pub availabilities: &'a [String],
}

/// Dataset, model and schema, loaded once and read-only afterwards.
#[derive(Debug)]
pub struct Estimator {
    dataset: Arc<ListingTable>,
    schema: FeatureSchema,
    predictor: PricePredictor,
    recommender: RecommenderConfig,
    city: String,
}

impl Estimator {
    /// Loads every artifact named in `config`. Any failure is fatal.
    pub fn load(config: &Config) -> Result<Self> {
        Self::load_with(config, &DatasetCache::new(&config.dataset_path))
    }

    /// Like `load`, but reuses a dataset that may already be cached.
    pub fn load_with(config: &Config, cache: &DatasetCache) -> Result<Self> {
        let dataset = cache.get()?;
        let columns = load_columns(&config.columns_path)?;
        let model = load_model(&config.model_path)?;

        let estimator = Self::new(dataset, columns, model, config).map_err(|err| match err {
            EstimatorError::InvalidSchema(message) => {
                EstimatorError::startup("model columns", &config.columns_path, message)
            }
            other => other,
        })?;

        tracing::info!(
            listings = estimator.dataset.n_samples(),
            features = estimator.schema.len(),
            locations = estimator.dataset.locations().len(),
            "estimator ready"
        );
        Ok(estimator)
    }

    pub fn new(
        dataset: Arc<ListingTable>,
        columns: Vec<String>,
        model: Box<dyn Regressor>,
        config: &Config,
    ) -> Result<Self> {
        let schema = FeatureSchema::new(columns)?;
        let predictor = PricePredictor::new(model, &schema)?;

        Ok(Self {
            dataset,
            schema,
            predictor,
            recommender: config.recommender,
            city: config.city.clone(),
        })
    }

    pub fn dataset(&self) -> &ListingTable {
        &self.dataset
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn options(&self) -> InputOptions<'_> {
        InputOptions {
            locations: self.dataset.locations(),
            area_types: self.dataset.area_types(),
            availabilities: self.dataset.availabilities(),
        }
    }

    pub fn predict(&self, features: &HouseFeatures) -> Result<PredictionResult> {
        features.validate()?;
        self.predictor.predict(&encode(features, &self.schema))
    }

    pub fn recommend(&self, location: &str, predicted_price: f64, area: f64) -> Result<RecommendationSet> {
        recommend_with(&self.dataset, location, predicted_price, area, &self.recommender)
    }

    /// Prices the house, then finds locations with a similar price per area.
    pub fn estimate(&self, features: &HouseFeatures) -> Result<Estimate> {
        let prediction = self.predict(features)?;
        let recommendations = self.recommend(&features.location, prediction.price, features.area)?;

        tracing::debug!(
            location = %features.location,
            price = prediction.price,
            n_recommendations = recommendations.len(),
            "estimate complete"
        );

        Ok(Estimate {
            prediction,
            recommendations,
            map_url: map_search_url(&features.location, &self.city),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Listing;
    use crate::linear_model::LinearRegression;
    use ndarray::array;

    fn dataset() -> Arc<ListingTable> {
        let listings = vec![
            Listing::new("Aundh", 1000.0, 50.0).unwrap().terms("Plot  Area", "Ready To Move"),
            Listing::new("Baner", 1000.0, 52.0).unwrap().terms("Super built-up  Area", "Ready To Move"),
            Listing::new("Wakad", 1000.0, 90.0).unwrap().terms("Plot  Area", "19-Dec"),
        ];
        Arc::new(ListingTable::new(listings))
    }

    fn columns() -> Vec<String> {
        ["bhk", "bath", "balcony", "new_total_sqft", "site_location_Aundh", "site_location_Baner"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn estimator() -> Estimator {
        // 0.05 lakh per sqft; the Aundh indicator cancels the intercept
        let model = LinearRegression::new(array![0.0, 0.0, 0.0, 0.05, 1.0, 0.0], -1.0);
        Estimator::new(dataset(), columns(), Box::new(model), &Config::default()).unwrap()
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

    #[test]
    fn test_estimate_end_to_end() {
        let estimate = estimator().estimate(&features()).unwrap();

        assert_eq!(estimate.prediction.price, 50.0);
        assert_eq!(estimate.recommendations.locations(), &["Baner".to_string()]);
        assert_eq!(estimate.map_url, "https://www.google.com/maps/search/Aundh+Pune");
    }

    #[test]
    fn test_estimate_rejects_out_of_range_input() {
        let mut input = features();
        input.room_count = 11;

        let err = estimator().estimate(&input).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidInput(_)));
    }

    #[test]
    fn test_options_are_sorted() {
        let estimator = estimator();
        let options = estimator.options();

        assert_eq!(options.locations, &["Aundh", "Baner", "Wakad"]);
        assert_eq!(options.area_types, &["Plot  Area", "Super built-up  Area"]);
        assert_eq!(options.availabilities, &["19-Dec", "Ready To Move"]);
    }

    #[test]
    fn test_new_rejects_model_width_mismatch() {
        let model = LinearRegression::new(array![1.0, 2.0], 0.0);
        let result = Estimator::new(dataset(), columns(), Box::new(model), &Config::default());

        assert!(matches!(result, Err(EstimatorError::InvalidSchema(_))));
    }
}
