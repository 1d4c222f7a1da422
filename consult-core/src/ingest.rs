//! Submission ingestion orchestration.
//!
//! Validates the incoming form fields, extracts attachment text, runs the
//! analyzer, and records the submission with its derived comment. Either
//! the whole submission is recorded or nothing is.

use consult_common::{Error, Result};
use tracing::{info, warn};

use crate::analyzer::FeedbackAnalyzer;
use crate::extract::{extract_text, DocumentFormat};
use crate::model::{Analysis, AnalyzedComment, Submission, UserInfo};
use crate::store::FeedbackStore;

/// One uploaded attachment: filename (for the format hint) plus raw bytes.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Incoming feedback, as decoded from the submission form.
#[derive(Debug, Clone, Default)]
pub struct NewFeedback {
    pub name: String,
    pub organization: Option<String>,
    pub email: String,
    pub clause: String,
    pub comment: String,
    pub attachments: Vec<Attachment>,
}

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub submission_id: String,
    pub analysis: Analysis,
}

/// Ingest one feedback submission end to end.
///
/// Classifier failures never abort ingestion (the analyzer substitutes the
/// fallback record); extraction failures abort this submission only.
pub async fn ingest(
    store: &dyn FeedbackStore,
    analyzer: &FeedbackAnalyzer,
    feedback: NewFeedback,
) -> Result<IngestOutcome> {
    validate(&feedback)?;

    let user_info = UserInfo {
        name: feedback.name,
        organization: feedback.organization,
        email: feedback.email,
    };

    let full_text = combine_text(&feedback.comment, &feedback.attachments)?;

    let analysis = analyzer
        .analyze(&full_text, &feedback.clause, &user_info)
        .await;

    let submission = Submission::new(user_info, feedback.clause, full_text, analysis.clone());
    let comment = AnalyzedComment::from_submission(&submission);

    let submission_id = store.record(submission, comment).await;
    info!(submission_id = %submission_id, "Feedback submission recorded");

    Ok(IngestOutcome {
        submission_id,
        analysis,
    })
}

/// Reject submissions missing any required field.
fn validate(feedback: &NewFeedback) -> Result<()> {
    for (field, value) in [
        ("name", &feedback.name),
        ("email", &feedback.email),
        ("clause", &feedback.clause),
        ("comment", &feedback.comment),
    ] {
        if value.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Missing required field: {}",
                field
            )));
        }
    }
    Ok(())
}

/// Combine the typed comment with extracted attachment text, blank-line
/// separated. An unreadable attachment fails the whole submission.
fn combine_text(comment: &str, attachments: &[Attachment]) -> Result<String> {
    let mut extracted = Vec::new();
    for attachment in attachments {
        let format = DocumentFormat::from_filename(&attachment.filename);
        match extract_text(&attachment.bytes, format) {
            Ok(Some(text)) if !text.is_empty() => extracted.push(text),
            Ok(_) => {
                warn!(filename = %attachment.filename, "Attachment yielded no text, skipping");
            }
            Err(e) => {
                return Err(Error::Extraction(format!(
                    "{}: {}",
                    attachment.filename, e
                )));
            }
        }
    }

    if extracted.is_empty() {
        Ok(comment.to_string())
    } else {
        Ok(format!("{}\n\n{}", comment, extracted.join("\n\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, ClassifierError};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubClassifier {
        response: std::result::Result<String, String>,
    }

    #[async_trait]
    impl Classifier for StubClassifier {
        fn name(&self) -> &str {
            "stub"
        }

        async fn classify(
            &self,
            _prompt: &str,
        ) -> std::result::Result<String, ClassifierError> {
            self.response.clone().map_err(|message| ClassifierError {
                classifier: "stub".into(),
                message,
                status_code: None,
            })
        }
    }

    fn analyzer_with(response: std::result::Result<&str, &str>) -> FeedbackAnalyzer {
        FeedbackAnalyzer::new(Arc::new(StubClassifier {
            response: response.map(String::from).map_err(String::from),
        }))
    }

    fn feedback(comment: &str) -> NewFeedback {
        NewFeedback {
            name: "Ravi Kumar".into(),
            organization: None,
            email: "ravi@example.org".into(),
            clause: "Clause 7".into(),
            comment: comment.into(),
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn successful_ingestion_stores_analysis() {
        let store = MemoryStore::new();
        let analyzer = analyzer_with(Ok(
            r#"{"sentiment": "positive", "sentiment_score": 0.9, "is_actionable": true}"#,
        ));

        let outcome = ingest(&store, &analyzer, feedback("Great clause"))
            .await
            .unwrap();

        assert_eq!(outcome.analysis.sentiment.to_string(), "positive");
        let submissions = store.submissions().await;
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].id, outcome.submission_id);
        assert_eq!(submissions[0].analysis.sentiment.to_string(), "positive");
        assert_eq!(store.comments().await.len(), 1);
    }

    #[tokio::test]
    async fn classifier_failure_still_creates_submission() {
        let store = MemoryStore::new();
        let analyzer = analyzer_with(Err("network down"));

        let outcome = ingest(&store, &analyzer, feedback("Great clause"))
            .await
            .unwrap();

        assert_eq!(outcome.analysis, Analysis::fallback());
        assert_eq!(store.total().await, 1);
    }

    #[tokio::test]
    async fn missing_field_is_invalid_input() {
        let store = MemoryStore::new();
        let analyzer = analyzer_with(Ok("{}"));

        let mut bad = feedback("text");
        bad.email = "  ".into();

        let err = ingest(&store, &analyzer, bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(store.total().await, 0);
    }

    #[tokio::test]
    async fn corrupt_attachment_aborts_only_this_submission() {
        let store = MemoryStore::new();
        let analyzer = analyzer_with(Ok("{}"));

        let mut bad = feedback("See attached");
        bad.attachments.push(Attachment {
            filename: "broken.pdf".into(),
            bytes: b"not a pdf".to_vec(),
        });

        let err = ingest(&store, &analyzer, bad).await.unwrap_err();
        assert!(err.is_extraction());
        assert_eq!(store.total().await, 0);

        // The store still accepts later submissions.
        ingest(&store, &analyzer, feedback("No attachment this time"))
            .await
            .unwrap();
        assert_eq!(store.total().await, 1);
    }

    #[tokio::test]
    async fn unsupported_attachment_is_ignored() {
        let store = MemoryStore::new();
        let analyzer = analyzer_with(Ok("{}"));

        let mut fb = feedback("Just the comment");
        fb.attachments.push(Attachment {
            filename: "photo.png".into(),
            bytes: vec![0xFF, 0xD8],
        });

        ingest(&store, &analyzer, fb).await.unwrap();
        let submissions = store.submissions().await;
        assert_eq!(submissions[0].text, "Just the comment");
    }

    #[test]
    fn combined_text_is_blank_line_separated() {
        // No attachments: comment verbatim.
        let text = combine_text("The comment", &[]).unwrap();
        assert_eq!(text, "The comment");
    }
}
