use clap::Parser;
use rfm_predictor::utils::{error::ErrorSeverity, logger, validation::Validate};
use rfm_predictor::{load_predictor, serve, CliConfig, ConfigProvider, RfmError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting rfm-predictor");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(e);
    }

    let predictor = match load_predictor(config.model_path()) {
        Ok(predictor) => predictor,
        Err(e) => {
            tracing::error!("❌ Failed to load model from {}: {}", config.model_path(), e);
            fail(e);
        }
    };

    serve(&config, predictor).await?;
    Ok(())
}

fn fail(e: RfmError) -> ! {
    eprintln!("❌ {}", e);
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
