//! Feedback analysis via the external classifier.
//!
//! Builds the instruction prompt, invokes the classifier once, and parses
//! the response defensively. Any failure along the way degrades to the
//! complete fallback record; ingestion never aborts because the classifier
//! misbehaved.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::model::{Analysis, Impact, Relevance, Sentiment, StakeholderType, UserInfo};

/// Analyzer for consultation feedback text.
pub struct FeedbackAnalyzer {
    classifier: Arc<dyn Classifier>,
}

impl FeedbackAnalyzer {
    /// Create a new analyzer over the given classifier capability.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Analyze one piece of feedback.
    ///
    /// A single classifier call, no retries: a failed or malformed response
    /// is immediately downgraded to [`Analysis::fallback`].
    pub async fn analyze(&self, text: &str, clause: &str, user_info: &UserInfo) -> Analysis {
        let prompt = self.build_prompt(text, clause, user_info);

        let response = match self.classifier.classify(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "Classifier call failed, using fallback analysis"
                );
                return Analysis::fallback();
            }
        };

        self.parse_response(&response)
    }

    /// Build the instruction prompt embedding the inputs and the literal
    /// JSON shape the classifier must produce.
    fn build_prompt(&self, text: &str, clause: &str, user_info: &UserInfo) -> String {
        let organization = user_info.organization.as_deref().unwrap_or("");
        format!(
            r#"Analyze this public consultation feedback for a policy document and provide insights in JSON format.

## Submitter
- Name: {}
- Organization: {}
- Email: {}

## Related Clause
{}

## Feedback Text
{}

## Required output

Respond with a single JSON object of exactly this shape:
```json
{{
  "sentiment": "positive/negative/neutral",
  "sentiment_score": 0.0,
  "key_phrases": ["phrase1", "phrase2", "phrase3"],
  "suggested_action": "text describing suggested action",
  "impact": "High/Medium/Low",
  "relevance": "Very Relevant/Relevant/General",
  "summary": "brief summary of the feedback",
  "is_actionable": true,
  "stakeholder_type": "Individual/Organization/Industry Body"
}}
```"#,
            user_info.name, organization, user_info.email, clause, text
        )
    }

    /// Parse the raw classifier response into a complete analysis.
    fn parse_response(&self, content: &str) -> Analysis {
        let Some(json_str) = extract_json(content) else {
            debug!("No JSON object in classifier response, trying keyword recovery");
            return self.recover_sentiment(content);
        };

        let parsed: serde_json::Value = match serde_json::from_str(&json_str) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Classifier response is not valid JSON, trying keyword recovery");
                return self.recover_sentiment(content);
            }
        };

        let fallback = Analysis::fallback();

        let sentiment = parsed
            .get("sentiment")
            .and_then(|v| v.as_str())
            .and_then(Sentiment::parse_lenient)
            .unwrap_or(fallback.sentiment);

        let sentiment_score = parsed
            .get("sentiment_score")
            .and_then(|v| v.as_f64())
            .unwrap_or(fallback.sentiment_score);

        let key_phrases: Vec<String> = parsed
            .get("key_phrases")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        let suggested_action = parsed
            .get("suggested_action")
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or(fallback.suggested_action);

        let impact = parsed
            .get("impact")
            .and_then(|v| v.as_str())
            .and_then(Impact::parse_lenient)
            .unwrap_or(fallback.impact);

        let relevance = parsed
            .get("relevance")
            .and_then(|v| v.as_str())
            .and_then(Relevance::parse_lenient)
            .unwrap_or(fallback.relevance);

        let summary = parsed
            .get("summary")
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or(fallback.summary);

        let is_actionable = parsed
            .get("is_actionable")
            .and_then(|v| v.as_bool())
            .unwrap_or(fallback.is_actionable);

        let stakeholder_type = parsed
            .get("stakeholder_type")
            .and_then(|v| v.as_str())
            .and_then(StakeholderType::parse_lenient)
            .unwrap_or(fallback.stakeholder_type);

        Analysis {
            sentiment,
            sentiment_score,
            key_phrases,
            suggested_action,
            impact,
            relevance,
            summary,
            is_actionable,
            stakeholder_type,
        }
    }

    /// Degraded-parse mode: the response carried no usable JSON, but may
    /// still contain a recognizable sentiment token.
    fn recover_sentiment(&self, content: &str) -> Analysis {
        let mut analysis = Analysis::fallback();
        if let Some(sentiment) = scan_sentiment_keywords(content) {
            analysis.sentiment = sentiment;
        }
        analysis
    }
}

/// Extract a JSON object from classifier response text.
///
/// Looks for a ```json code fence first, then falls back to matching the
/// outermost braces of raw JSON embedded in prose.
fn extract_json(content: &str) -> Option<String> {
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Some(content[start..start + end].trim().to_string());
        }
    }

    if let Some(start) = content.find('{') {
        let mut depth = 0;
        for (i, c) in content[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(content[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }
    }

    None
}

/// Scan free text for a coarse sentiment token.
fn scan_sentiment_keywords(content: &str) -> Option<Sentiment> {
    let lower = content.to_lowercase();
    if lower.contains("disagree") || lower.contains("negative") {
        Some(Sentiment::Negative)
    } else if lower.contains("agree") || lower.contains("positive") {
        Some(Sentiment::Positive)
    } else if lower.contains("neutral") {
        Some(Sentiment::Neutral)
    } else {
        None
    }
}
