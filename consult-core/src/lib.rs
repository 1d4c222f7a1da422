//! Consultation feedback analysis pipeline.
//!
//! This crate covers the path from a raw submission to queryable analytics:
//! - Document text extraction (PDF/DOCX uploads)
//! - Feedback analysis via an external classifier, with a deterministic
//!   fallback when the classifier fails or returns garbage
//! - Append-only in-memory storage of submissions and their
//!   dashboard-oriented projections
//! - Aggregate analytics recomputed on demand
//!
//! ## Data flow
//! ```text
//! upload → extract → FeedbackAnalyzer (classifier + defensive parse)
//!        → Submission + AnalyzedComment → FeedbackStore → summarize
//! ```

pub mod analytics;
pub mod analyzer;
pub mod classifier;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod store;

pub use analytics::{summarize, AnalyticsSummary};
pub use analyzer::FeedbackAnalyzer;
pub use classifier::{Classifier, ClassifierError, GeminiClassifier};
pub use extract::{extract_text, DocumentFormat, ExtractionError};
pub use ingest::{ingest, Attachment, IngestOutcome, NewFeedback};
pub use model::{Analysis, AnalyzedComment, Sentiment, StakeholderType, Submission, UserInfo};
pub use store::{FeedbackStore, MemoryStore};
