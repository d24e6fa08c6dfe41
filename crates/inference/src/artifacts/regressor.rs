//! Regression models exported from the training pipeline.
//!
//! Two model families are supported:
//! - `linear`: intercept plus weighted sum
//! - `tree_ensemble`: array-encoded decision trees, summed (boosting) or
//!   averaged (random forest)

use crate::error::{InferenceError, Result, SchemaMismatch};
use crate::matrix::FeatureMatrix;
use crate::traits::Regressor;
use serde::{Deserialize, Serialize};

/// The `model.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// `base_score + learning_rate * sum(leaves)`
    #[default]
    Sum,
    /// `mean(leaves)`
    Mean,
}

/// A tree node. Splits send `x[feature] <= threshold` to `left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk from the root to a leaf.
    ///
    /// Returns `None` when the walk leaves the node array, splits on a
    /// feature the row does not have, or visits more nodes than the tree
    /// holds (a cycle). `validate` rules all of these out for loaded models.
    fn leaf_value(&self, row: &[f64]) -> Option<f64> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match *self.nodes.get(index)? {
                Node::Leaf { value } => return Some(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if *row.get(feature)? <= threshold { left } else { right };
                }
            }
        }
        None
    }
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let mut total = 0.0;
        for (t, tree) in self.trees.iter().enumerate() {
            total += tree.leaf_value(row).ok_or_else(|| {
                InferenceError::ArtifactIncompatible(format!("tree {t} has no reachable leaf"))
            })?;
        }
        Ok(match self.aggregation {
            Aggregation::Sum => self.base_score + self.learning_rate * total,
            Aggregation::Mean => total / self.trees.len() as f64,
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {t} has no nodes"));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match *node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if feature >= self.n_features {
                            return Err(format!(
                                "tree {t} node {i} splits on feature {feature}, model has {}",
                                self.n_features
                            ));
                        }
                        if !threshold.is_finite() {
                            return Err(format!("tree {t} node {i} has a non-finite threshold"));
                        }
                        let in_range = |child: usize| child > i && child < tree.nodes.len();
                        if !in_range(left) || !in_range(right) {
                            return Err(format!("tree {t} node {i} has an invalid child index"));
                        }
                    }
                    Node::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(format!("tree {t} node {i} has a non-finite leaf"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl RegressionModel {
    /// Structural checks run once at load time.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            RegressionModel::Linear(model) => {
                if model.coefficients.is_empty() {
                    return Err("linear model has no coefficients".to_string());
                }
                if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear model has non-finite parameters".to_string());
                }
                Ok(())
            }
            RegressionModel::TreeEnsemble(ensemble) => ensemble.validate(),
        }
    }
}

impl Regressor for RegressionModel {
    fn name(&self) -> &str {
        match self {
            RegressionModel::Linear(_) => "LinearModel",
            RegressionModel::TreeEnsemble(_) => "TreeEnsemble",
        }
    }

    fn n_features(&self) -> usize {
        match self {
            RegressionModel::Linear(model) => model.coefficients.len(),
            RegressionModel::TreeEnsemble(ensemble) => ensemble.n_features,
        }
    }

    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        if matrix.n_cols() != self.n_features() {
            return Err(SchemaMismatch::Width {
                expected: self.n_features(),
                found: matrix.n_cols(),
            }
            .into());
        }

        match self {
            RegressionModel::Linear(model) => {
                Ok(matrix.rows().map(|r| model.predict_row(r)).collect())
            }
            RegressionModel::TreeEnsemble(ensemble) => {
                matrix.rows().map(|r| ensemble.predict_row(r)).collect()
            }
        }
    }

    fn check_structure(&self) -> std::result::Result<(), String> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, low: f64, high: f64) -> Tree {
        Tree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { value: low },
                Node::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = RegressionModel::Linear(LinearModel {
            coefficients: vec![2.0, -1.0],
            intercept: 0.5,
        });
        let matrix = FeatureMatrix::single_row(vec![3.0, 1.0]);

        assert_eq!(model.predict(&matrix).unwrap(), vec![5.5]);
    }

    #[test]
    fn test_boosted_ensemble_sums_leaves() {
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            base_score: 10.0,
            learning_rate: 0.5,
            aggregation: Aggregation::Sum,
            trees: vec![stump(0.0, -2.0, 2.0), stump(5.0, 1.0, 3.0)],
        });

        let low = FeatureMatrix::single_row(vec![-1.0]);
        let high = FeatureMatrix::single_row(vec![6.0]);
        // 10 + 0.5 * (-2 + 1)
        assert_eq!(model.predict(&low).unwrap(), vec![9.5]);
        // 10 + 0.5 * (2 + 3)
        assert_eq!(model.predict(&high).unwrap(), vec![12.5]);
    }

    #[test]
    fn test_forest_averages_leaves() {
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            learning_rate: 1.0,
            aggregation: Aggregation::Mean,
            trees: vec![stump(0.0, 2.0, 4.0), stump(0.0, 6.0, 8.0)],
        });

        let row = FeatureMatrix::single_row(vec![0.0]);
        // Threshold is inclusive: 0.0 goes left in both trees
        assert_eq!(model.predict(&row).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let model = RegressionModel::Linear(LinearModel {
            coefficients: vec![1.0; 30],
            intercept: 0.0,
        });
        let matrix = FeatureMatrix::single_row(vec![1.0; 29]);

        let err = model.predict(&matrix).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::SchemaMismatch(SchemaMismatch::Width { expected: 30, found: 29 })
        ));
    }

    #[test]
    fn test_validate_rejects_backward_child_index() {
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            learning_rate: 1.0,
            aggregation: Aggregation::Sum,
            trees: vec![Tree {
                nodes: vec![
                    Node::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 0,
                        right: 1,
                    },
                    Node::Leaf { value: 1.0 },
                ],
            }],
        });

        assert!(model.validate().unwrap_err().contains("invalid child index"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_feature() {
        let mut tree = stump(0.0, 1.0, 2.0);
        tree.nodes[0] = Node::Split {
            feature: 3,
            threshold: 0.0,
            left: 1,
            right: 2,
        };
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: 2,
            base_score: 0.0,
            learning_rate: 1.0,
            aggregation: Aggregation::Sum,
            trees: vec![tree],
        });

        assert!(model.validate().is_err());
    }

    #[test]
    fn test_deserialize_tree_ensemble_with_defaults() {
        let json = r#"{
            "kind": "tree_ensemble",
            "n_features": 2,
            "trees": [
                { "nodes": [
                    { "feature": 1, "threshold": 0.5, "left": 1, "right": 2 },
                    { "value": 16.0 },
                    { "value": 18.0 }
                ] }
            ]
        }"#;

        let model: RegressionModel = serde_json::from_str(json).unwrap();
        assert!(model.validate().is_ok());
        assert_eq!(model.name(), "TreeEnsemble");

        let matrix = FeatureMatrix::single_row(vec![0.0, 1.0]);
        assert_eq!(model.predict(&matrix).unwrap(), vec![18.0]);
    }

    #[test]
    fn test_unvalidated_split_on_missing_feature_is_an_error() {
        let mut tree = stump(0.0, 1.0, 2.0);
        tree.nodes[0] = Node::Split {
            feature: 99,
            threshold: 0.0,
            left: 1,
            right: 2,
        };
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            learning_rate: 1.0,
            aggregation: Aggregation::Sum,
            trees: vec![tree],
        });

        let err = model
            .predict(&FeatureMatrix::single_row(vec![0.0]))
            .unwrap_err();
        assert!(matches!(err, InferenceError::ArtifactIncompatible(_)));
        assert!(model.check_structure().unwrap_err().contains("feature 99"));
    }

    #[test]
    fn test_cyclic_tree_terminates_with_an_error() {
        let model = RegressionModel::TreeEnsemble(TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            learning_rate: 1.0,
            aggregation: Aggregation::Sum,
            trees: vec![Tree {
                nodes: vec![
                    Node::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 1,
                        right: 1,
                    },
                    Node::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 0,
                        right: 0,
                    },
                ],
            }],
        });

        let err = model
            .predict(&FeatureMatrix::single_row(vec![0.0]))
            .unwrap_err();
        assert!(err.to_string().contains("tree 0 has no reachable leaf"));
    }
}
