//! # Feedback model
//! Source records as they come out of storage, the normalized item the scorer
//! consumes, and the scored item the dashboard renders.
//!
//! Two storage shapes exist: rated reviews (Play Store, App Store, Google Maps,
//! web search) and unrated social comments (Instagram). They are kept apart as
//! variants of [`SourceRecord`] and only meet in [`RawFeedbackItem`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag used for social comments; also the id prefix.
pub const SOCIAL_SOURCE: &str = "instagram";

/// Review or comment carrying a star rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatedFeedback {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    pub rating: i32,
    #[serde(default)]
    pub helpful_votes: Option<u32>,
    pub source: String, // "playstore", "appstore", "googlemaps", ...
    #[serde(default)]
    pub review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub app_id: Option<i64>,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Social comment without a rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialFeedback {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub likes_count: Option<u32>,
    /// RFC 3339 string or unix seconds, as the scraper delivered it.
    #[serde(default)]
    pub timestamp: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub post_url: Option<String>,
    #[serde(default)]
    pub app_id: Option<i64>,
    #[serde(default)]
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceRecord {
    Rated(RatedFeedback),
    Social(SocialFeedback),
}

/// Uniform shape every record is converted to before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeedbackItem {
    pub id: String,
    pub text: String,
    pub author: String,
    pub rating: Option<i32>,
    pub likes: u32,
    pub source: String,
    /// Original creation time, or `created_at` when the source has none.
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub app_id: Option<i64>,
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Fixed thresholds over the summed score: >=7 high, 5..=6 medium, else low.
    pub fn from_total(total: u8) -> Self {
        match total {
            t if t >= 7 => Priority::High,
            5 | 6 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Kanban column. Only ever changed client-side; the scorer always emits `Incoming`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Incoming,
    InProgress,
    Resolved,
}

/// One row of the prioritized list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredFeedback {
    pub id: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub source: String,
    pub author: String,
    pub likes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    pub sentiment: Sentiment,
    pub category: String,
    pub priority: Priority,
    pub status: FeedbackStatus,
    pub total_score: u8,
    pub sentiment_score: u8,
    pub likes_score: u8,
    pub recency_score: u8,
}
