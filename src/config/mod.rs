pub mod toml_config;

use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use self::toml_config::{LoggingConfig, TomlConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "rfm-predictor")]
#[command(about = "Upload a customer CSV and predict who is likely to buy")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, help = "Path to the JSON model artifact")]
    pub model_path: Option<String>,

    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the TOML file, if any, and applies command line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model_path) = &self.model_path {
            config.model.path = model_path.clone();
        }
        if let Some(max_upload_bytes) = self.max_upload_bytes {
            config.server.max_upload_bytes = max_upload_bytes;
        }
        if self.json_logs {
            let logging = config.logging.get_or_insert(LoggingConfig {
                level: None,
                format: None,
            });
            logging.format = Some("json".to_string());
        }

        Ok(config)
    }
}
