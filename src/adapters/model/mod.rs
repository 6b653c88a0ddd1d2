//! Serialized classifier artifacts and the `Predictor` they back.

pub mod logistic;
pub mod tree;

use crate::domain::model::{FeatureRow, Label};
use crate::domain::ports::Predictor;
use crate::utils::error::{RfmError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use logistic::LogisticRegression;
pub use tree::{DecisionTree, RandomForest, TreeNode};

/// On-disk model description, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ModelArtifact {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading model artifact");

        let content = std::fs::read_to_string(path)?;
        let artifact = Self::from_json_str(&content)?;

        info!(kind = artifact.kind(), "Model loaded successfully");
        Ok(artifact)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::LogisticRegression(_) => "logistic_regression",
            ModelArtifact::DecisionTree(_) => "decision_tree",
            ModelArtifact::RandomForest(_) => "random_forest",
        }
    }

    fn predict_one(&self, row: &FeatureRow) -> Label {
        match self {
            ModelArtifact::LogisticRegression(model) => model.predict_one(row),
            ModelArtifact::DecisionTree(model) => model.predict_one(row),
            ModelArtifact::RandomForest(model) => model.predict_one(row),
        }
    }
}

impl Validate for ModelArtifact {
    fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::LogisticRegression(model) => model.validate(),
            ModelArtifact::DecisionTree(model) => model.validate(),
            ModelArtifact::RandomForest(model) => model.validate(),
        }
    }
}

impl Predictor for ModelArtifact {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>> {
        Ok(rows.iter().map(|row| self.predict_one(row)).collect())
    }

    fn describe(&self) -> &str {
        self.kind()
    }
}

/// Loads the artifact at `path` into a shareable predictor handle.
pub fn load_predictor<P: AsRef<Path>>(path: P) -> Result<Arc<dyn Predictor>> {
    let path = path.as_ref();
    let artifact = ModelArtifact::from_file(path).map_err(|e| match e {
        RfmError::IoError(io) => RfmError::ModelError {
            message: format!("cannot read {}: {}", path.display(), io),
        },
        RfmError::SerializationError(json) => RfmError::ModelError {
            message: format!("cannot parse {}: {}", path.display(), json),
        },
        other => other,
    })?;
    Ok(Arc::new(artifact))
}
