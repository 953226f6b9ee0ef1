//! Feedback Triage Service — Binary Entrypoint
//! Boots the Axum HTTP server: config, feedback store, keyword tables, metrics.

use feedback_triage::config::ServiceConfig;
use feedback_triage::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
/// Filter comes from `RUST_LOG`, falling back to `feedback_triage=info,warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feedback_triage=info,keywords=info,prioritize=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    // Shuttle may already have installed a subscriber; keep theirs in that case.
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ServiceConfig::load_default().map_err(shuttle_runtime::Error::Custom)?;
    tracing::info!(?cfg, "service config resolved");

    let metrics = Metrics::init().map_err(shuttle_runtime::Error::Custom)?;
    let router = feedback_triage::build_app(&cfg)
        .map_err(shuttle_runtime::Error::Custom)?
        .merge(metrics.router());

    Ok(router.into())
}
