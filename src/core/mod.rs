pub mod handler;
pub mod table;

pub use crate::domain::model::{FeatureRow, Label, PredictionResult, UploadedTable};
pub use crate::domain::ports::{ConfigProvider, Predictor};
pub use crate::utils::error::Result;
