//! Turning raw house attributes into model input rows.
//!
//! This module provides:
//! - `FeatureSchema`: the model's column list with column positions resolved up front
//! - `HouseFeatures`: the raw attributes entered by the user
//! - `encode`: builds a one-hot `FeatureVector` aligned with the schema
//!
//! # Examples
//!
//! ```rust
//! use house_price::preprocessing::{encode, FeatureSchema, HouseFeatures};
//!
//! let columns = ["bhk", "bath", "balcony", "new_total_sqft", "site_location_Aundh"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let schema = FeatureSchema::new(columns).unwrap();
//!
//! let features = HouseFeatures {
//!     location: "Aundh".to_string(),
//!     room_count: 2,
//!     bathroom_count: 2,
//!     balcony_count: 1,
//!     area: 1000.0,
//!     area_type: "Plot  Area".to_string(),
//!     availability: "Ready To Move".to_string(),
//! };
//!
//! let row = encode(&features, &schema);
//! assert_eq!(row.get("site_location_Aundh"), Some(1.0));
//! assert_eq!(row.get("new_total_sqft"), Some(1000.0));
//! ```

mod encoder;
mod schema;

pub use encoder::{
    encode, FeatureVector, HouseFeatures, AREA_RANGE, BALCONY_COUNT_RANGE, BATHROOM_COUNT_RANGE,
    ROOM_COUNT_RANGE,
};
pub use schema::{
    load_columns, Dimension, FeatureSchema, AREA_COLUMN, BALCONY_COUNT_COLUMN, BATHROOM_COUNT_COLUMN,
    ROOM_COUNT_COLUMN,
};
