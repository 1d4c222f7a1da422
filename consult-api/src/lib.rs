//! Consultation feedback API service.
//!
//! Exposes the analysis pipeline over HTTP:
//! - Multipart feedback submission with PDF/DOCX attachments
//! - Submission lookup by email
//! - Analyzed comments and analytics summary for the dashboard
//!
//! ## Architecture
//!
//! ```text
//! Client → consult-api (validation) → consult-core
//!            extract → analyze (Gemini) → store → summarize
//! ```

pub mod routes;

pub use routes::{build_all_routes, AppState, ErrorResponse, SubmitResponse};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use consult_common::Config;
use consult_core::{FeedbackAnalyzer, GeminiClassifier, MemoryStore};

/// Build the API router with all routes and middleware.
pub fn build_router(config: &Config) -> Router {
    let classifier = GeminiClassifier::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_endpoint.clone(),
        Duration::from_secs(config.classifier_timeout_secs),
    );

    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FeedbackAnalyzer::new(Arc::new(classifier))),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    build_all_routes(state).layer(cors)
}

/// Start the API server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = SocketAddr::from((
        config.host.parse::<std::net::IpAddr>()?,
        config.port,
    ));

    let router = build_router(config);

    tracing::info!("Starting consult-api on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
