use std::process::ExitCode;

use page_analyzer::config::AppConfig;
use page_analyzer::{logging, server};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("logging init failed: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!(format = ?config.log.format, "logger initialized");

    match server::serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "page-analyzer stopped");
            ExitCode::FAILURE
        }
    }
}
