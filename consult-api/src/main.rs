//! Consultation feedback API - Main entry point.

use anyhow::Result;
use consult_common::logging::init_logging;
use consult_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.log_level, &config.log_format);

    tracing::info!("consult-api v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        tracing::warn!(
            "GEMINI_API_KEY is not set; submissions will receive the fallback analysis"
        );
    }

    // Start the API server
    consult_api::start_server(&config).await
}
