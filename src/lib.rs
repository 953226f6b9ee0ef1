// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod classify;
pub mod collector;
pub mod config;
pub mod feedback;
pub mod metrics;
pub mod prioritize;
pub mod reply;
pub mod scoring;
pub mod sorter;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::feedback::{Priority, RawFeedbackItem, ScoredFeedback, Sentiment, SourceRecord};
pub use crate::prioritize::{FeedbackFilters, PrioritizationService, PriorityStats};

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::classify::HotReloadKeywords;
use crate::config::ServiceConfig;
use crate::store::InMemoryStore;

/// Build the full router (store, keyword tables, service) from a config.
/// Does not install the metrics recorder; the binary does that once.
pub fn build_app(cfg: &ServiceConfig) -> anyhow::Result<shuttle_axum::axum::Router> {
    let store = InMemoryStore::load_from_file(&cfg.store.path)
        .with_context(|| format!("loading feedback store from {}", cfg.store.path.display()))?;
    info!(records = store.len(), path = %cfg.store.path.display(), "feedback store loaded");

    let keywords = HotReloadKeywords::new(Some(cfg.keywords.path.as_path()));
    info!(path = %keywords.path().display(), "keyword tables watched");
    let service = PrioritizationService::new(
        Arc::new(store),
        Arc::new(keywords),
        cfg.prioritize.limit_strategy,
    );
    Ok(create_router(AppState::new(service)))
}
