// src/store.rs
//! Storage boundary. The prioritizer only ever sees fully materialized lists.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::feedback::{RatedFeedback, SocialFeedback, SourceRecord};

#[async_trait::async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Rated reviews, optionally narrowed to one source tag and/or app.
    async fn fetch_rated(
        &self,
        source: Option<&str>,
        app_id: Option<i64>,
    ) -> Result<Vec<RatedFeedback>>;

    /// Unrated social comments, optionally narrowed to one app.
    async fn fetch_social(&self, app_id: Option<i64>) -> Result<Vec<SocialFeedback>>;

    fn name(&self) -> &'static str;
}

/// Records kept in memory, typically loaded from a JSON fixture/export.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<SourceRecord>,
}

impl InMemoryStore {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let records: Vec<SourceRecord> =
            serde_json::from_str(s).context("parsing feedback records")?;
        Ok(Self::new(records))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading feedback records from {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn app_matches(record_app: Option<i64>, wanted: Option<i64>) -> bool {
    wanted.is_none() || record_app == wanted
}

#[async_trait::async_trait]
impl FeedbackStore for InMemoryStore {
    async fn fetch_rated(
        &self,
        source: Option<&str>,
        app_id: Option<i64>,
    ) -> Result<Vec<RatedFeedback>> {
        Ok(self
            .records
            .iter()
            .filter_map(|r| match r {
                SourceRecord::Rated(r) => Some(r),
                SourceRecord::Social(_) => None,
            })
            .filter(|r| source.map_or(true, |s| r.source.eq_ignore_ascii_case(s)))
            .filter(|r| app_matches(r.app_id, app_id))
            .cloned()
            .collect())
    }

    async fn fetch_social(&self, app_id: Option<i64>) -> Result<Vec<SocialFeedback>> {
        Ok(self
            .records
            .iter()
            .filter_map(|r| match r {
                SourceRecord::Social(s) => Some(s),
                SourceRecord::Rated(_) => None,
            })
            .filter(|s| app_matches(s.app_id, app_id))
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
