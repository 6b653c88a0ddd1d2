pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::http::{build_app, serve, AppState};
pub use crate::adapters::model::{load_predictor, ModelArtifact};
pub use crate::config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::handler::UploadPredictHandler;
pub use crate::domain::ports::{ConfigProvider, Predictor};
pub use crate::utils::error::{RfmError, Result};
