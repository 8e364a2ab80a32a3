use std::collections::HashSet;

use crate::dataset::ListingTable;
use crate::error::{EstimatorError, Result};

/// Base currency units per lakh.
pub const LAKH: f64 = 100_000.0;

/// Price in base units per unit of area, from a price in lakhs.
pub fn price_per_area(price_lakhs: f64, area: f64) -> f64 {
    (price_lakhs * LAKH) / area
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecommenderConfig {
    /// Relative half-width of the price-per-area band.
    pub tolerance: f64,
    /// Maximum number of locations returned.
    pub limit: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.10,
            limit: 5,
        }
    }
}

/// Inclusive price-per-area window around a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceBand {
    pub target: f64,
    pub lower: f64,
    pub upper: f64,
}

impl PriceBand {
    /// `tolerance` must lie in `[0, 1)`.
    pub fn around(predicted_price: f64, query_area: f64, tolerance: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&tolerance) {
            return Err(EstimatorError::invalid_input(format!(
                "tolerance must be in [0, 1), got {}",
                tolerance
            )));
        }
        if !query_area.is_finite() || query_area <= 0.0 {
            return Err(EstimatorError::invalid_input(format!(
                "query area must be positive, got {}",
                query_area
            )));
        }
        if !predicted_price.is_finite() {
            return Err(EstimatorError::invalid_input("predicted price is not finite"));
        }

        let target = price_per_area(predicted_price, query_area);
        Ok(Self {
            target,
            lower: target * (1.0 - tolerance),
            upper: target * (1.0 + tolerance),
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Comparable locations in the order they first appear in the dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecommendationSet {
    locations: Vec<String>,
}

impl RecommendationSet {
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.locations.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.locations
    }
}

impl IntoIterator for RecommendationSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecommendationSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

/// Up to five locations whose listings sit within ±10% of the predicted
/// price per area, excluding `query_location`.
pub fn recommend(
    dataset: &ListingTable,
    query_location: &str,
    predicted_price: f64,
    query_area: f64,
) -> Result<RecommendationSet> {
    recommend_with(
        dataset,
        query_location,
        predicted_price,
        query_area,
        &RecommenderConfig::default(),
    )
}

pub fn recommend_with(
    dataset: &ListingTable,
    query_location: &str,
    predicted_price: f64,
    query_area: f64,
    config: &RecommenderConfig,
) -> Result<RecommendationSet> {
    if config.limit == 0 {
        return Err(EstimatorError::invalid_input("limit must be at least 1"));
    }
    let band = PriceBand::around(predicted_price, query_area, config.tolerance)?;

    let mut seen = HashSet::new();
    let locations: Vec<String> = dataset
        .listings()
        .iter()
        .filter(|listing| band.contains(listing.price_per_area()))
        .map(|listing| listing.location.as_str())
        .filter(|location| *location != query_location)
        .filter(|location| seen.insert(*location))
        .take(config.limit)
        .map(str::to_string)
        .collect();

    tracing::debug!(
        target_price_per_area = band.target,
        lower = band.lower,
        upper = band.upper,
        n_found = locations.len(),
        "recommended comparable locations"
    );

    Ok(RecommendationSet { locations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Listing;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn listing(location: &str, area: f64, price: f64) -> Listing {
        Listing::new(location, area, price).unwrap()
    }

    #[test]
    fn test_target_price_per_area() {
        let band = PriceBand::around(50.0, 1000.0, 0.10).unwrap();

        assert!((band.target - 5000.0).abs() < 1e-10);
        assert!((band.lower - 4500.0).abs() < 1e-9);
        assert!((band.upper - 5500.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_excludes_query_and_out_of_band() {
        let table = ListingTable::new(vec![
            listing("A", 1000.0, 10.0),
            listing("B", 1000.0, 10.5),
            listing("C", 1000.0, 20.0),
        ]);

        let result = recommend(&table, "A", 10.0, 1000.0).unwrap();
        assert_eq!(result.locations(), &["B".to_string()]);
    }

    #[test]
    fn test_empty_band_is_not_an_error() {
        let table = ListingTable::new(vec![listing("A", 1000.0, 10.0), listing("B", 1000.0, 90.0)]);

        let result = recommend(&table, "Z", 50.0, 1000.0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_distinct_first_seen_order_and_limit() {
        let table = ListingTable::new(vec![
            listing("Kothrud", 1000.0, 50.0),
            listing("Aundh", 1000.0, 51.0),
            listing("Kothrud", 1000.0, 49.0),
            listing("Wakad", 1000.0, 52.0),
            listing("Baner", 1000.0, 48.0),
            listing("Hadapsar", 1000.0, 47.0),
            listing("Kharadi", 1000.0, 53.0),
            listing("Viman Nagar", 1000.0, 50.5),
        ]);

        let result = recommend(&table, "Aundh", 50.0, 1000.0).unwrap();
        assert_eq!(
            result.into_vec(),
            vec!["Kothrud", "Wakad", "Baner", "Hadapsar", "Kharadi"]
        );
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let table = ListingTable::new(vec![
            listing("Low", 1000.0, 37.5),
            listing("High", 1000.0, 62.5),
            listing("Below", 1000.0, 37.4),
        ]);
        let config = RecommenderConfig {
            tolerance: 0.25,
            limit: 5,
        };

        let result = recommend_with(&table, "Q", 50.0, 1000.0, &config).unwrap();
        assert_eq!(result.into_vec(), vec!["Low", "High"]);
    }

    #[test]
    fn test_invalid_query_area() {
        let table = ListingTable::new(vec![listing("A", 1000.0, 10.0)]);

        assert!(recommend(&table, "A", 10.0, 0.0).is_err());
        assert!(recommend(&table, "A", 10.0, -5.0).is_err());
        assert!(recommend(&table, "A", 10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_tolerance() {
        for tolerance in [-0.1, 1.0, 1.5, f64::NAN, f64::INFINITY] {
            let err = PriceBand::around(50.0, 1000.0, tolerance).unwrap_err();
            assert!(matches!(err, EstimatorError::InvalidInput(_)), "tolerance {tolerance}");
        }
        assert!(PriceBand::around(50.0, 1000.0, 0.0).is_ok());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let table = ListingTable::new(vec![listing("A", 1000.0, 10.0), listing("B", 1000.0, 10.0)]);
        let config = RecommenderConfig {
            tolerance: 0.10,
            limit: 0,
        };

        let err = recommend_with(&table, "A", 10.0, 1000.0, &config).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidInput(_)));
    }

    #[test]
    fn test_recommend_is_idempotent_and_leaves_dataset_unchanged() {
        let table = ListingTable::new(vec![
            listing("A", 1200.0, 60.0),
            listing("B", 1000.0, 52.0),
            listing("C", 800.0, 39.0),
        ]);
        let before: Vec<f64> = table.listings().iter().map(|l| l.price_per_area()).collect();

        let first = recommend(&table, "A", 50.0, 1000.0).unwrap();
        let second = recommend(&table, "A", 50.0, 1000.0).unwrap();
        let after: Vec<f64> = table.listings().iter().map(|l| l.price_per_area()).collect();

        assert_eq!(first, second);
        assert_eq!(before, after);
    }

    #[test]
    fn test_invariants_on_random_datasets() {
        let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let listings = (0..200)
                .map(|_| {
                    let name = names[rng.gen_range(0..names.len())];
                    listing(name, rng.gen_range(300.0..3000.0), rng.gen_range(10.0..200.0))
                })
                .collect();
            let table = ListingTable::new(listings);
            let query = names[rng.gen_range(0..names.len())];

            let result = recommend(&table, query, rng.gen_range(10.0..200.0), rng.gen_range(100.0..20000.0)).unwrap();

            assert!(result.len() <= 5);
            assert!(result.iter().all(|l| l != query));
            let distinct: HashSet<&String> = result.iter().collect();
            assert_eq!(distinct.len(), result.len());
        }
    }
}
