//! Aggregate analytics over the analyzed-comment collection.
//!
//! `summarize` is a pure function recomputed on every query. Acceptable at
//! demo scale; a persistent deployment would want an incremental rollup
//! once the collection grows unbounded.

use serde::{Deserialize, Serialize};

use crate::model::{AnalyzedComment, Sentiment, StakeholderType};

/// How many concerns the summary surfaces at most.
const TOP_CONCERNS_LIMIT: usize = 3;

/// Counts per sentiment value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Counts per stakeholder bucket, in dashboard vocabulary.
///
/// `other` is the remainder after the three named buckets; since every
/// record's stakeholder type falls in one of them, it is never negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderDistribution {
    #[serde(rename = "Industry Associations")]
    pub industry_associations: usize,
    #[serde(rename = "Corporate Bodies")]
    pub corporate_bodies: usize,
    #[serde(rename = "Individual Citizens")]
    pub individual_citizens: usize,
    #[serde(rename = "Other")]
    pub other: usize,
}

/// Ephemeral summary recomputed from the full collection on each query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_comments: usize,
    pub key_stakeholders: usize,
    pub actionable_suggestions: usize,
    /// Reserved for coordinated-campaign detection; always 0.
    pub coordinated_campaigns: usize,
    pub sentiment_distribution: SentimentDistribution,
    pub stakeholder_distribution: StakeholderDistribution,
    /// Non-empty iff at least one negative-sentiment record exists.
    pub top_concerns: Vec<String>,
}

/// Compute summary statistics over the analyzed comments.
pub fn summarize(comments: &[AnalyzedComment]) -> AnalyticsSummary {
    let total_comments = comments.len();
    let key_stakeholders = comments.iter().filter(|c| c.is_key_stakeholder).count();
    let actionable_suggestions = comments.iter().filter(|c| c.kind == "actionable").count();

    let mut sentiment_distribution = SentimentDistribution::default();
    for comment in comments {
        match comment.sentiment {
            Sentiment::Positive => sentiment_distribution.positive += 1,
            Sentiment::Negative => sentiment_distribution.negative += 1,
            Sentiment::Neutral => sentiment_distribution.neutral += 1,
        }
    }

    let industry_associations = comments
        .iter()
        .filter(|c| c.analysis.stakeholder_type == StakeholderType::IndustryBody)
        .count();
    let corporate_bodies = comments
        .iter()
        .filter(|c| c.analysis.stakeholder_type == StakeholderType::Organization)
        .count();
    let individual_citizens = comments
        .iter()
        .filter(|c| c.analysis.stakeholder_type == StakeholderType::Individual)
        .count();
    let stakeholder_distribution = StakeholderDistribution {
        industry_associations,
        corporate_bodies,
        individual_citizens,
        other: total_comments
            .saturating_sub(industry_associations + corporate_bodies + individual_citizens),
    };

    AnalyticsSummary {
        total_comments,
        key_stakeholders,
        actionable_suggestions,
        coordinated_campaigns: 0,
        sentiment_distribution,
        stakeholder_distribution,
        top_concerns: derive_top_concerns(comments),
    }
}

/// Derive the top-concerns list from negative-sentiment comments.
///
/// Frequency-ranked key phrases first, then summaries, then a generic
/// entry, so the list is non-empty exactly when negative feedback exists.
fn derive_top_concerns(comments: &[AnalyzedComment]) -> Vec<String> {
    let negatives: Vec<&AnalyzedComment> = comments
        .iter()
        .filter(|c| c.sentiment == Sentiment::Negative)
        .collect();

    if negatives.is_empty() {
        return Vec::new();
    }

    // Count phrases preserving first-seen order so ties rank deterministically.
    let mut counted: Vec<(String, usize)> = Vec::new();
    for comment in &negatives {
        for phrase in &comment.analysis.key_phrases {
            let phrase = phrase.trim();
            if phrase.is_empty() {
                continue;
            }
            match counted.iter_mut().find(|(p, _)| p == phrase) {
                Some((_, count)) => *count += 1,
                None => counted.push((phrase.to_string(), 1)),
            }
        }
    }
    counted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut concerns: Vec<String> = counted
        .into_iter()
        .take(TOP_CONCERNS_LIMIT)
        .map(|(phrase, _)| phrase)
        .collect();

    if concerns.is_empty() {
        concerns = negatives
            .iter()
            .map(|c| c.analysis.summary.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .take(TOP_CONCERNS_LIMIT)
            .collect();
    }

    if concerns.is_empty() {
        concerns.push("General objection raised".to_string());
    }

    concerns
}
