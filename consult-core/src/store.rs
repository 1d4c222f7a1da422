//! In-memory storage for submissions and their analyzed-comment projections.
//!
//! Both collections are append-only: no update or delete exists in this
//! scope, and nothing persists across process restarts. The store is
//! injected wherever it is read or written so the pipeline is testable
//! without a running process and swappable for a persistent backend.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::{AnalyzedComment, Submission};

/// Storage abstraction over the two append-only collections.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Record a submission together with its derived comment, atomically.
    ///
    /// Assigns the comment's sequential identifier and returns the
    /// submission identifier. A submission is never observable without its
    /// comment or vice versa.
    async fn record(&self, submission: Submission, comment: AnalyzedComment) -> String;

    /// All submissions, in insertion order.
    async fn submissions(&self) -> Vec<Submission>;

    /// Submissions for a given email, in insertion order. Linear scan; no
    /// uniqueness is enforced on email.
    async fn submissions_by_email(&self, email: &str) -> Vec<Submission>;

    /// All analyzed comments, in insertion order.
    async fn comments(&self) -> Vec<AnalyzedComment>;

    /// Number of recorded submissions.
    async fn total(&self) -> usize;
}

/// Process-memory store backing the single-process deployment.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    submissions: Vec<Submission>,
    comments: Vec<AnalyzedComment>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn record(&self, submission: Submission, mut comment: AnalyzedComment) -> String {
        let id = submission.id.clone();
        let mut inner = self.inner.write().await;
        comment.id = inner.comments.len() + 1;
        inner.submissions.push(submission);
        inner.comments.push(comment);
        id
    }

    async fn submissions(&self) -> Vec<Submission> {
        self.inner.read().await.submissions.clone()
    }

    async fn submissions_by_email(&self, email: &str) -> Vec<Submission> {
        self.inner
            .read()
            .await
            .submissions
            .iter()
            .filter(|s| s.user_info.email == email)
            .cloned()
            .collect()
    }

    async fn comments(&self) -> Vec<AnalyzedComment> {
        self.inner.read().await.comments.clone()
    }

    async fn total(&self) -> usize {
        self.inner.read().await.submissions.len()
    }
}
