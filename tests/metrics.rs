// tests/metrics.rs
use std::sync::Arc;

use shuttle_axum::axum::body::{self, Body};
use shuttle_axum::axum::http::{Request, StatusCode};
use shuttle_axum::axum::Router;
use tower::ServiceExt;

use feedback_triage::classify::HotReloadKeywords;
use feedback_triage::metrics::Metrics;
use feedback_triage::prioritize::{LimitStrategy, PrioritizationService};
use feedback_triage::store::InMemoryStore;
use feedback_triage::{create_router, AppState};

const RECORDS: &str = r#"[
    {"kind":"rated","id":1,"content":"Погано","rating":1,"helpful_votes":80,
     "source":"playstore","created_at":"2020-01-01T00:00:00Z"},
    {"kind":"social","id":"s1","text":"Супер","likes_count":2,"created_at":"2020-01-02T00:00:00Z"}
]"#;

// Only this test binary installs the global recorder.
fn build_app() -> Router {
    let metrics = Metrics::init().expect("recorder installs once per process");
    let service = PrioritizationService::new(
        Arc::new(InMemoryStore::from_json_str(RECORDS).unwrap()),
        Arc::new(HotReloadKeywords::new(None)),
        LimitStrategy::BeforeScoring,
    );
    create_router(AppState::new(service)).merge(metrics.router())
}

async fn get(app: &Router, uri: &str) -> String {
    let resp = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    String::from_utf8(body.to_vec()).unwrap()
}

/// Value of an unlabelled series in the exposition text.
fn sample(text: &str, name: &str) -> Option<f64> {
    text.lines()
        .filter(|l| !l.starts_with('#'))
        .find_map(|l| l.strip_prefix(name)?.strip_prefix(' ')?.trim().parse().ok())
}

// One test: the recorder is process-global.
#[tokio::test]
async fn metrics_endpoint_counts_list_requests_only() {
    let app = build_app();

    get(&app, "/feedback/prioritized").await;
    let text = get(&app, "/metrics").await;
    for needle in [
        "feedback_scored_total",
        "feedback_priority_total",
        "feedback_prioritize_ms",
    ] {
        assert!(text.contains(needle), "missing {needle} in /metrics:\n{text}");
    }
    assert!(text.contains(r#"tier="high""#), "tier label missing:\n{text}");
    // no source filter: only the rated review is scored
    assert_eq!(sample(&text, "feedback_scored_total"), Some(1.0), "{text}");

    // stats reuse the list without counting it again
    get(&app, "/feedback/priority-stats").await;
    let text = get(&app, "/metrics").await;
    assert_eq!(sample(&text, "feedback_scored_total"), Some(1.0), "{text}");

    get(&app, "/feedback/prioritized?source=instagram").await;
    let text = get(&app, "/metrics").await;
    assert_eq!(sample(&text, "feedback_scored_total"), Some(2.0), "{text}");
}
