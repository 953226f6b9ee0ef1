//! # Prioritization
//! The two operations the dashboard calls: the prioritized feedback list and
//! per-tier counts over that same list.
//!
//! Pipeline (single pass, no state kept between calls):
//! store fetch → collect (newest first) → window → score + classify → sort.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_category, sentiment_label, HotReloadKeywords, KeywordTables};
use crate::collector::{apply_window, collect};
use crate::feedback::{
    FeedbackStatus, Priority, RawFeedbackItem, ScoredFeedback, SourceRecord, SOCIAL_SOURCE,
};
use crate::scoring::ScoreBreakdown;
use crate::sorter::sort_prioritized;
use crate::store::FeedbackStore;

pub const MAX_LIMIT: u32 = 1000;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feedback_scored_total", "Feedback items scored.");
        describe_counter!(
            "feedback_priority_total",
            "Scored feedback items by priority tier."
        );
        describe_counter!("feedback_store_errors_total", "Feedback store fetch errors.");
        describe_histogram!(
            "feedback_prioritize_ms",
            "Time to build one prioritized list, in milliseconds."
        );
    });
}

/// Where the offset/limit window is cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStrategy {
    /// Cut the newest-first list before scoring. A high-scoring older item can
    /// fall outside the window.
    #[default]
    BeforeScoring,
    /// Score everything, then cut the sorted list.
    AfterScoring,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFilters {
    /// Informational only; scoring and ordering ignore it.
    #[serde(default)]
    pub status: Option<FeedbackStatus>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub app_id: Option<i64>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("limit must be between 1 and 1000, got {0}")]
    LimitOutOfRange(u32),
    #[error("appId must be positive, got {0}")]
    InvalidAppId(i64),
}

impl FeedbackFilters {
    pub fn validate(&self) -> Result<(), FilterError> {
        if let Some(l) = self.limit {
            if !(1..=MAX_LIMIT).contains(&l) {
                return Err(FilterError::LimitOutOfRange(l));
            }
        }
        if let Some(a) = self.app_id {
            if a <= 0 {
                return Err(FilterError::InvalidAppId(a));
            }
        }
        Ok(())
    }

    /// Blank source strings count as "no source filter".
    fn source_tag(&self) -> Option<&str> {
        self.source.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Score and classify one normalized item. Pure: same input, same output.
pub fn score_item(item: &RawFeedbackItem, tables: &KeywordTables, now: DateTime<Utc>) -> ScoredFeedback {
    let breakdown = ScoreBreakdown::compute(item, now);
    ScoredFeedback {
        id: item.id.clone(),
        text: item.text.clone(),
        date: item.date,
        source: item.source.clone(),
        author: item.author.clone(),
        likes: item.likes,
        rating: item.rating,
        app_name: item.app_name.clone(),
        sentiment: sentiment_label(item.rating, &item.text, tables),
        category: classify_category(&item.text, tables),
        priority: breakdown.priority(),
        status: FeedbackStatus::Incoming,
        total_score: breakdown.total,
        sentiment_score: breakdown.sentiment,
        likes_score: breakdown.likes,
        recency_score: breakdown.recency,
    }
}

/// Score, classify and sort an already collected list.
pub fn prioritize(
    items: &[RawFeedbackItem],
    tables: &KeywordTables,
    now: DateTime<Utc>,
) -> Vec<ScoredFeedback> {
    let mut scored: Vec<ScoredFeedback> =
        items.iter().map(|it| score_item(it, tables, now)).collect();
    sort_prioritized(&mut scored);
    scored
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityStats {
    pub fn tally(items: &[ScoredFeedback]) -> Self {
        items.iter().fold(Self::default(), |mut acc, it| {
            acc.total += 1;
            match it.priority {
                Priority::High => acc.high += 1,
                Priority::Medium => acc.medium += 1,
                Priority::Low => acc.low += 1,
            }
            acc
        })
    }
}

pub struct PrioritizationService {
    store: Arc<dyn FeedbackStore>,
    keywords: Arc<HotReloadKeywords>,
    limit_strategy: LimitStrategy,
}

impl PrioritizationService {
    pub fn new(
        store: Arc<dyn FeedbackStore>,
        keywords: Arc<HotReloadKeywords>,
        limit_strategy: LimitStrategy,
    ) -> Self {
        ensure_metrics_described();
        Self {
            store,
            keywords,
            limit_strategy,
        }
    }

    pub fn keywords(&self) -> Arc<KeywordTables> {
        self.keywords.current()
    }

    async fn fetch_records(&self, filters: &FeedbackFilters) -> anyhow::Result<Vec<SourceRecord>> {
        let mut records = Vec::new();
        match filters.source_tag() {
            Some(tag) if tag.eq_ignore_ascii_case(SOCIAL_SOURCE) => {
                let social = self.store.fetch_social(filters.app_id).await?;
                records.extend(social.into_iter().map(SourceRecord::Social));
            }
            Some(tag) => {
                let rated = self.store.fetch_rated(Some(tag), filters.app_id).await?;
                records.extend(rated.into_iter().map(SourceRecord::Rated));
            }
            // Social comments only come back when asked for by name.
            None => {
                let rated = self.store.fetch_rated(None, filters.app_id).await?;
                records.extend(rated.into_iter().map(SourceRecord::Rated));
            }
        }
        Ok(records)
    }

    /// Fetch, collect, window, score and sort. No metrics are recorded here
    /// apart from store failures.
    async fn build_list(
        &self,
        filters: &FeedbackFilters,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScoredFeedback>> {
        let records = match self.fetch_records(filters).await {
            Ok(r) => r,
            Err(e) => {
                counter!("feedback_store_errors_total").increment(1);
                tracing::warn!(target: "prioritize", error = ?e, store = self.store.name(), "store fetch failed");
                return Err(e);
            }
        };

        let items = collect(records);
        let tables = self.keywords.current();

        let scored = match self.limit_strategy {
            LimitStrategy::BeforeScoring => {
                let window = apply_window(items, filters.offset, filters.limit);
                prioritize(&window, &tables, now)
            }
            LimitStrategy::AfterScoring => {
                apply_window(prioritize(&items, &tables, now), filters.offset, filters.limit)
            }
        };
        Ok(scored)
    }

    /// The prioritized list. This is the only path that bumps
    /// `feedback_scored_total` and `feedback_priority_total`.
    pub async fn get_prioritized_feedbacks(
        &self,
        filters: &FeedbackFilters,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScoredFeedback>> {
        let started = Instant::now();
        let scored = self.build_list(filters, now).await?;

        let stats = PriorityStats::tally(&scored);
        counter!("feedback_scored_total").increment(stats.total as u64);
        for (tier, n) in [
            (Priority::High, stats.high),
            (Priority::Medium, stats.medium),
            (Priority::Low, stats.low),
        ] {
            counter!("feedback_priority_total", "tier" => tier.as_str()).increment(n as u64);
        }
        histogram!("feedback_prioritize_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        tracing::info!(
            target: "prioritize",
            total = stats.total,
            high = stats.high,
            medium = stats.medium,
            low = stats.low,
            source = filters.source_tag().unwrap_or("*"),
            status = ?filters.status,
            "prioritized feedback list built"
        );

        Ok(scored)
    }

    /// Per-tier counts over the same list `get_prioritized_feedbacks` returns
    /// for these filters. Scoring counters are left alone.
    pub async fn get_priority_stats(
        &self,
        filters: &FeedbackFilters,
        now: DateTime<Utc>,
    ) -> anyhow::Result<PriorityStats> {
        let scored = self.build_list(filters, now).await?;
        let stats = PriorityStats::tally(&scored);
        tracing::debug!(
            target: "prioritize",
            total = stats.total,
            source = filters.source_tag().unwrap_or("*"),
            "priority stats computed"
        );
        Ok(stats)
    }
}
