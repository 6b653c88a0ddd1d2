use crate::domain::model::{FeatureRow, Label};
use crate::utils::error::{RfmError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn probability(&self, row: &FeatureRow) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.as_array())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }

    pub fn predict_one(&self, row: &FeatureRow) -> Label {
        if self.probability(row) >= self.threshold {
            1
        } else {
            0
        }
    }
}

impl Validate for LogisticRegression {
    fn validate(&self) -> Result<()> {
        if self.coefficients.len() != 3 {
            return Err(RfmError::ModelError {
                message: format!(
                    "logistic regression needs 3 coefficients, found {}",
                    self.coefficients.len()
                ),
            });
        }
        if self
            .coefficients
            .iter()
            .chain(std::iter::once(&self.intercept))
            .any(|v| !v.is_finite())
        {
            return Err(RfmError::ModelError {
                message: "logistic regression weights must be finite".to_string(),
            });
        }
        validate_range("threshold", self.threshold, 0.0, 1.0).map_err(|e| RfmError::ModelError {
            message: format!("invalid logistic regression artifact: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(recency: f64, frequency: f64, monetary: f64) -> FeatureRow {
        FeatureRow {
            recency,
            frequency,
            monetary,
        }
    }

    #[test]
    fn test_recent_frequent_customers_score_high() {
        let model = LogisticRegression {
            coefficients: vec![-0.1, 0.8, 0.01],
            intercept: -1.0,
            threshold: 0.5,
        };
        assert_eq!(model.predict_one(&row(2.0, 10.0, 500.0)), 1);
        assert_eq!(model.predict_one(&row(300.0, 1.0, 10.0)), 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let model = LogisticRegression {
            coefficients: vec![0.0, 0.0, 0.0],
            intercept: 0.0,
            threshold: 0.5,
        };
        assert_eq!(model.probability(&row(1.0, 1.0, 1.0)), 0.5);
        assert_eq!(model.predict_one(&row(1.0, 1.0, 1.0)), 1);
    }

    #[test]
    fn test_wrong_coefficient_count_is_rejected() {
        let model = LogisticRegression {
            coefficients: vec![1.0, 2.0],
            intercept: 0.0,
            threshold: 0.5,
        };
        assert!(model.validate().is_err());
    }
}
