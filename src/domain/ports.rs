use crate::domain::model::{FeatureRow, Label};
use crate::utils::error::Result;

/// A trained classifier with a fixed `recency, frequency, monetary` input.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait Predictor: Send + Sync {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>>;

    /// Short name for logs and the health endpoint.
    fn describe(&self) -> &str {
        "predictor"
    }
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn model_path(&self) -> &str;
    fn max_upload_bytes(&self) -> usize;

    fn bind_address(&self) -> String {
        if self.host().contains(':') {
            format!("[{}]:{}", self.host(), self.port())
        } else {
            format!("{}:{}", self.host(), self.port())
        }
    }
}
