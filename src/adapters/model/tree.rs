use crate::domain::model::{FeatureRow, Label};
use crate::utils::error::{RfmError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: Label,
    },
}

/// Binary tree stored as a flat node list with the root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children always point forward, so the walk ends after at most
    /// `nodes.len()` steps on a validated tree.
    pub fn predict_one(&self, row: &FeatureRow) -> Label {
        let features = row.as_array();
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(TreeNode::Leaf { label }) => return *label,
                None => return 0,
            }
        }
    }
}

impl Validate for DecisionTree {
    fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(RfmError::ModelError {
                message: "decision tree has no nodes".to_string(),
            });
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                let invalid = |message: String| RfmError::ModelError {
                    message: format!("node {}: {}", i, message),
                };
                if *feature >= 3 {
                    return Err(invalid(format!("feature index {} out of range", feature)));
                }
                if !threshold.is_finite() {
                    return Err(invalid("threshold must be finite".to_string()));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(invalid(format!("child index {} is invalid", child)));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Majority vote; ties go to the smallest label.
    pub fn predict_one(&self, row: &FeatureRow) -> Label {
        let mut votes: BTreeMap<Label, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict_one(row)).or_default() += 1;
        }

        let mut best: Option<(Label, usize)> = None;
        for (label, count) in votes {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label).unwrap_or_default()
    }
}

impl Validate for RandomForest {
    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(RfmError::ModelError {
                message: "random forest has no trees".to_string(),
            });
        }
        self.trees.iter().try_for_each(Validate::validate)
    }
}
