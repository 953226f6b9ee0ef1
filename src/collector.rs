// src/collector.rs
//! Collector/Normalizer: turns rated reviews and social comments into one
//! `RawFeedbackItem` list ordered by ingestion time (newest first).

use chrono::{DateTime, TimeZone, Utc};

use crate::feedback::{
    RatedFeedback, RawFeedbackItem, SocialFeedback, SourceRecord, SOCIAL_SOURCE,
};

/// Normalize text: decode HTML entities, collapse whitespace, trim.
/// Angle brackets are user text and stay as written.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    // split_whitespace also folds NBSP
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a scraper timestamp: RFC 3339, or unix seconds / milliseconds.
pub fn parse_social_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let n: i64 = raw.parse().ok()?;
    // 13 digits and up are milliseconds
    if n.abs() >= 1_000_000_000_000 {
        Utc.timestamp_millis_opt(n).single()
    } else {
        Utc.timestamp_opt(n, 0).single()
    }
}

fn from_rated(r: RatedFeedback) -> RawFeedbackItem {
    RawFeedbackItem {
        id: r.id.to_string(),
        text: normalize_text(&r.content),
        author: r.author,
        rating: Some(r.rating),
        likes: r.helpful_votes.unwrap_or(0),
        source: r.source,
        date: r.review_date.unwrap_or(r.created_at),
        created_at: r.created_at,
        app_id: r.app_id,
        app_name: r.app_name,
    }
}

fn from_social(s: SocialFeedback) -> RawFeedbackItem {
    let date = match s.timestamp.as_deref().map(parse_social_timestamp) {
        Some(Some(dt)) => dt,
        Some(None) => {
            tracing::debug!(
                target: "collector",
                id = %s.id,
                "unparseable social timestamp; using created_at"
            );
            s.created_at
        }
        None => s.created_at,
    };
    RawFeedbackItem {
        id: format!("{SOCIAL_SOURCE}_{}", s.id),
        text: normalize_text(&s.text),
        author: s.username,
        rating: None,
        likes: s.likes_count.unwrap_or(0),
        source: SOCIAL_SOURCE.to_string(),
        date,
        created_at: s.created_at,
        app_id: s.app_id,
        app_name: s.app_name,
    }
}

pub fn normalize(record: SourceRecord) -> RawFeedbackItem {
    match record {
        SourceRecord::Rated(r) => from_rated(r),
        SourceRecord::Social(s) => from_social(s),
    }
}

/// Normalize everything and order by `created_at`, newest first (stable).
pub fn collect<I>(records: I) -> Vec<RawFeedbackItem>
where
    I: IntoIterator<Item = SourceRecord>,
{
    let mut items: Vec<RawFeedbackItem> = records.into_iter().map(normalize).collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

/// Skip `offset` items, then keep at most `limit`.
pub fn apply_window<T>(items: Vec<T>, offset: Option<u32>, limit: Option<u32>) -> Vec<T> {
    let skip = offset.unwrap_or(0) as usize;
    let take = limit.map(|l| l as usize).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(take).collect()
}
