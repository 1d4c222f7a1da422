//! Domain model for consultation feedback.
//!
//! Submissions are created once at ingestion and never mutated; analyzed
//! comments are a display-oriented projection derived one-to-one from them.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Display text is cut at this many characters.
pub const DISPLAY_TEXT_LIMIT: usize = 500;

// ============================================================================
// Closed Vocabularies
// ============================================================================

/// Sentiment of a piece of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parse classifier output leniently. Agree/disagree vocabularies used by
    /// some deployments map onto the positive/negative/neutral set.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "agree" => Some(Self::Positive),
            "negative" | "disagree" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Assessed impact of the feedback on the policy clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// How relevant the feedback is to the referenced clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relevance {
    #[serde(rename = "Very Relevant")]
    VeryRelevant,
    Relevant,
    General,
}

impl Relevance {
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "very relevant" | "very_relevant" => Some(Self::VeryRelevant),
            "relevant" => Some(Self::Relevant),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

/// Classification of the submitting party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeholderType {
    Individual,
    Organization,
    #[serde(rename = "Industry Body")]
    IndustryBody,
}

impl StakeholderType {
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "individual" => Some(Self::Individual),
            "organization" | "organisation" => Some(Self::Organization),
            "industry body" | "industry_body" => Some(Self::IndustryBody),
            _ => None,
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Structured analysis of one piece of feedback.
///
/// Every field is always present: when the classifier fails or returns
/// garbage, the analyzer substitutes [`Analysis::fallback`] rather than a
/// partial record, so downstream code never sees missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub sentiment: Sentiment,
    /// Nominal range [-1.0, 1.0]; not enforced by the classifier.
    pub sentiment_score: f64,
    pub key_phrases: Vec<String>,
    pub suggested_action: String,
    pub impact: Impact,
    pub relevance: Relevance,
    pub summary: String,
    pub is_actionable: bool,
    pub stakeholder_type: StakeholderType,
}

impl Analysis {
    /// The complete default record returned whenever the classifier call
    /// fails or its response cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.0,
            key_phrases: Vec::new(),
            suggested_action: "No specific action suggested".to_string(),
            impact: Impact::Low,
            relevance: Relevance::General,
            summary: "Analysis unavailable".to_string(),
            is_actionable: false,
            stakeholder_type: StakeholderType::Individual,
        }
    }
}

// ============================================================================
// Submission
// ============================================================================

/// The submitting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub organization: Option<String>,
    pub email: String,
}

impl UserInfo {
    /// An organization counts only when it is a non-empty string.
    pub fn has_organization(&self) -> bool {
        self.organization.as_deref().is_some_and(|o| !o.is_empty())
    }

    /// Display label: "name (organization)" when an organization is present.
    pub fn source_label(&self) -> String {
        match self.organization.as_deref() {
            Some(org) if !org.is_empty() => format!("{} ({})", self.name, org),
            _ => self.name.clone(),
        }
    }
}

/// One user's feedback event, fully analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub user_info: UserInfo,
    pub clause: String,
    /// Typed comment plus any extracted document text, blank-line separated.
    pub text: String,
    pub analysis: Analysis,
    /// Creation date, YYYY-MM-DD.
    pub date: String,
    pub status: String,
}

impl Submission {
    /// Create a new submission with a generated identifier and today's date.
    pub fn new(user_info: UserInfo, clause: String, text: String, analysis: Analysis) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_info,
            clause,
            text,
            analysis,
            date: Utc::now().format("%Y-%m-%d").to_string(),
            status: "submitted".to_string(),
        }
    }
}

// ============================================================================
// Analyzed Comment
// ============================================================================

/// Display/aggregation-oriented projection of a submission.
///
/// The sequential `id` is assigned by the store at record time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedComment {
    pub id: usize,
    pub source: String,
    #[serde(rename = "isKeyStakeholder")]
    pub is_key_stakeholder: bool,
    pub sentiment: Sentiment,
    pub clause: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Reserved for coordinated-campaign detection; always false.
    pub campaign: bool,
    pub date: String,
    pub analysis: Analysis,
}

impl AnalyzedComment {
    /// Derive the dashboard projection from a submission.
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            id: 0, // assigned on record
            source: submission.user_info.source_label(),
            is_key_stakeholder: submission.user_info.has_organization(),
            sentiment: submission.analysis.sentiment,
            clause: submission.clause.clone(),
            text: truncate_for_display(&submission.text),
            kind: if submission.analysis.is_actionable {
                "actionable".to_string()
            } else {
                "comment".to_string()
            },
            campaign: false,
            date: submission.date.clone(),
            analysis: submission.analysis.clone(),
        }
    }
}

/// Truncate text for display: the first 500 characters plus an ellipsis
/// marker when longer, verbatim otherwise.
pub fn truncate_for_display(text: &str) -> String {
    if text.chars().count() > DISPLAY_TEXT_LIMIT {
        let mut out: String = text.chars().take(DISPLAY_TEXT_LIMIT).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}
