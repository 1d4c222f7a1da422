//! External classifier capability boundary.
//!
//! The classifier is an opaque generative-language service: given an
//! instruction prompt, it returns raw response text approximating the
//! requested JSON, or fails outright. All validation of the output is the
//! caller's responsibility.

mod gemini;

pub use gemini::GeminiClassifier;

use async_trait::async_trait;

/// Unified interface to the external classification capability.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Get the classifier name.
    fn name(&self) -> &str;

    /// Send an instruction prompt and return the raw response text.
    async fn classify(&self, prompt: &str) -> Result<String, ClassifierError>;
}

/// Error from a classifier call.
#[derive(Debug, Clone)]
pub struct ClassifierError {
    pub classifier: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.classifier, self.message)
    }
}

impl std::error::Error for ClassifierError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_error_display() {
        let err = ClassifierError {
            classifier: "gemini".into(),
            message: "quota exceeded".into(),
            status_code: Some(429),
        };
        assert_eq!(err.to_string(), "[gemini] quota exceeded");
    }
}
