//! Tree ensembles restored from fitted parameters.
//!
//! - `DecisionTreeRegressor`: a single binary regression tree
//! - `RandomForestRegressor`: the mean prediction of a set of trees

mod random_forest;

pub use random_forest::{
    DecisionTreeParams, DecisionTreeRegressor, RandomForestParams, RandomForestRegressor, TreeNode,
};
