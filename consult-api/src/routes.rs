//! Route definitions for the consultation feedback API.
//!
//! Thin handlers over the core pipeline: multipart submission intake, user
//! submission lookup, analyzed-comment listing, analytics summary, and
//! health checks.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use consult_core::analytics::AnalyticsSummary;
use consult_core::{
    ingest, summarize, Analysis, AnalyzedComment, Attachment, FeedbackAnalyzer, FeedbackStore,
    NewFeedback, Submission,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
    pub analyzer: Arc<FeedbackAnalyzer>,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedbackStore>, analyzer: Arc<FeedbackAnalyzer>) -> Self {
        Self { store, analyzer }
    }
}

/// Successful submission response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub submission_id: String,
    pub analysis: Analysis,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Build the complete router with all routes.
pub fn build_all_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/feedback", post(submit_feedback_handler))
        .route("/api/v1/submissions/:email", get(user_submissions_handler))
        .route("/api/v1/analytics/comments", get(analyzed_comments_handler))
        .route("/api/v1/analytics/summary", get(analytics_summary_handler))
        .with_state(state)
        .merge(health_routes())
}

/// Build health check routes.
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/health", get(health_handler))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Accept a multipart feedback submission and run it through the pipeline.
async fn submit_feedback_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, (StatusCode, Json<ErrorResponse>)> {
    let feedback = decode_multipart(multipart).await.map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed submission form");
        error_response(StatusCode::BAD_REQUEST, e)
    })?;

    match ingest(state.store.as_ref(), &state.analyzer, feedback).await {
        Ok(outcome) => Ok(Json(SubmitResponse {
            success: true,
            submission_id: outcome.submission_id,
            analysis: outcome.analysis,
        })),
        Err(e) => {
            tracing::error!(error = %e, "Feedback ingestion failed");
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err(error_response(status, e.to_string()))
        }
    }
}

/// Decode the multipart form into the core ingestion input.
async fn decode_multipart(mut multipart: Multipart) -> Result<NewFeedback, String> {
    let mut feedback = NewFeedback::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid multipart body: {}", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => feedback.name = read_text(field).await?,
            "organization" => {
                let value = read_text(field).await?;
                if !value.is_empty() {
                    feedback.organization = Some(value);
                }
            }
            "email" => feedback.email = read_text(field).await?,
            "clause" => feedback.clause = read_text(field).await?,
            "comment" => feedback.comment = read_text(field).await?,
            "files" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read upload: {}", e))?;
                if !filename.is_empty() && !bytes.is_empty() {
                    feedback.attachments.push(Attachment {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            // Unknown fields are ignored.
            _ => {}
        }
    }

    Ok(feedback)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, String> {
    field
        .text()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))
}

/// List all submissions for a given email address.
async fn user_submissions_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<Vec<Submission>> {
    Json(state.store.submissions_by_email(&email).await)
}

/// List all analyzed comments for the dashboard.
async fn analyzed_comments_handler(State(state): State<AppState>) -> Json<Vec<AnalyzedComment>> {
    Json(state.store.comments().await)
}

/// Compute the analytics summary over the current comment collection.
async fn analytics_summary_handler(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    let comments = state.store.comments().await;
    Json(summarize(&comments))
}

/// Health check handler.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "consult-api".to_string(),
    })
}

fn error_response(status: StatusCode, error: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
}
