//! Linear regression restored from fitted parameters.
//!
//! # Examples
//!
//! ```rust
//! use house_price::LinearRegression;
//! use ndarray::array;
//!
//! let model = LinearRegression::new(array![2.0], 3.0);
//! let predictions = model.predict(&array![[1.0], [2.0]]).unwrap();
//! assert_eq!(predictions, array![5.0, 7.0]);
//! ```

mod linear_regression;

pub use linear_regression::{LinearRegression, LinearRegressionParams};
