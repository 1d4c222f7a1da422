//! Google Gemini classifier.
//!
//! Calls the `generateContent` endpoint with the analysis prompt. The API
//! key comes from configuration (environment-sourced), never from source.

use super::{Classifier, ClassifierError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini-backed classifier with a bounded request timeout.
pub struct GeminiClassifier {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiClassifier {
    /// Create a new Gemini classifier.
    ///
    /// `base_url` is the API root (`https://generativelanguage.googleapis.com`
    /// in production, a local mock in tests); `timeout` bounds the full
    /// request round trip so a stalled call never blocks ingestion forever.
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn error(&self, message: impl Into<String>, status_code: Option<u16>) -> ClassifierError {
        ClassifierError {
            classifier: "gemini".into(),
            message: message.into(),
            status_code,
        }
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn classify(&self, prompt: &str) -> Result<String, ClassifierError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            self.error(
                "Gemini API key not found. Set the GEMINI_API_KEY environment variable.",
                None,
            )
        })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 2048,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.error(format!("Request failed: {}", e), None))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.error(
                format!("API error ({}): {}", status.as_u16(), error_text),
                Some(status.as_u16()),
            ));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.error(format!("Failed to parse response: {}", e), None))?;

        if let Some(err) = result.error {
            return Err(self.error(format!("API error: {}", err.message), None));
        }

        let candidate = result
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| self.error("No response from Gemini", None))?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .next()
            .and_then(|p| p.text)
            .unwrap_or_default();

        Ok(content)
    }
}
