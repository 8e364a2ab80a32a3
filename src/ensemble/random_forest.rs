use serde::{Deserialize, Serialize};

use crate::predictor::Regressor;
use crate::{ArrayView1, Matrix, Vector};

/// One node of a fitted regression tree.
///
/// Samples with `x[feature] <= threshold` follow `left`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    pub nodes: Vec<TreeNode>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_features: usize,
    pub trees: Vec<DecisionTreeParams>,
}

/// A fitted binary regression tree. Node 0 is the root.
#[derive(Clone, Debug)]
pub struct DecisionTreeRegressor {
    nodes: Vec<TreeNode>,
}

impl DecisionTreeRegressor {
    /// Children must come after their parent, which rules out cycles.
    pub fn new(nodes: Vec<TreeNode>, n_features: usize) -> Result<Self, String> {
        if nodes.is_empty() {
            return Err("Tree must have at least one node".to_string());
        }

        for (i, node) in nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "Node {} splits on feature {} but the model has {} features",
                            i, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("Node {} has a non-finite threshold", i));
                    }
                    for child in [left, right] {
                        if child <= i || child >= nodes.len() {
                            return Err(format!("Node {} has invalid child index {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("Leaf {} has a non-finite value", i));
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Averages the outputs of its trees.
#[derive(Clone, Debug)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn new(trees: Vec<DecisionTreeRegressor>, n_features: usize) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("Random forest must have at least one tree".to_string());
        }

        if n_features == 0 {
            return Err("Random forest must have at least one feature".to_string());
        }

        Ok(Self { trees, n_features })
    }

    pub fn from_params(params: RandomForestParams) -> Result<Self, String> {
        let n_features = params.n_features;
        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                DecisionTreeRegressor::new(tree.nodes, n_features).map_err(|e| format!("Tree {}: {}", i, e))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Self::new(trees, n_features)
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector, String> {
        if x.ncols() != self.n_features {
            return Err(format!(
                "Number of features in X ({}) doesn't match training data ({})",
                x.ncols(),
                self.n_features
            ));
        }

        let n_trees = self.trees.len() as f64;
        let predictions = x
            .rows()
            .into_iter()
            .map(|row| self.trees.iter().map(|tree| tree.predict_row(row)).sum::<f64>() / n_trees)
            .collect::<Vec<_>>();

        Ok(Vector::from(predictions))
    }
}

impl Regressor for RandomForestRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Matrix) -> Result<Vector, String> {
        RandomForestRegressor::predict(self, x)
    }
}
