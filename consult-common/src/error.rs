//! Error types for the consultation feedback services.

use thiserror::Error;

/// Result type alias using the unified error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the consultation services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request (missing form fields, bad values)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uploaded document could not be read or parsed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// External service error
    #[error("External service error: {0}")]
    External(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error aborts only a single submission rather than the
    /// process (extraction failures are scoped to one upload).
    pub const fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_))
    }

    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Timeout => 408,
            Self::WithContext { source, .. } => source.status_code(),
            _ => 500,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::InvalidInput("test".into()).status_code(), 400);
        assert_eq!(Error::NotFound("test".into()).status_code(), 404);
        assert_eq!(Error::Extraction("test".into()).status_code(), 500);
        assert_eq!(Error::Internal("test".into()).status_code(), 500);
        assert_eq!(Error::Timeout.status_code(), 408);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Extraction("bad xref table".into());
        let with_ctx = err.with_context("reading attachment");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert_eq!(with_ctx.status_code(), 500);
    }

    #[test]
    fn test_is_extraction() {
        assert!(Error::Extraction("corrupt".into()).is_extraction());
        assert!(!Error::InvalidInput("missing email".into()).is_extraction());
    }
}
