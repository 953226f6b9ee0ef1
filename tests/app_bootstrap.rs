// tests/app_bootstrap.rs
//
// The router the binary serves, built from the repo's config and sample data.

use shuttle_axum::axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt; // for `oneshot`

use feedback_triage::build_app;
use feedback_triage::config::{ServiceConfig, ENV_CONFIG_PATH};

#[serial_test::serial]
#[tokio::test]
async fn repo_config_and_sample_data_serve_rated_and_social_views() {
    std::env::remove_var(ENV_CONFIG_PATH);
    let cfg = ServiceConfig::load_default().expect("config/feedback.toml parses");
    let app = build_app(&cfg).expect("sample data loads");

    // data/feedback.json holds four rated reviews and two Instagram comments
    for (uri, expected) in [
        ("/feedback/priority-stats", 4),
        ("/feedback/priority-stats?source=instagram", 2),
    ] {
        let resp = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["total"], expected, "{uri}: {v}");
        let sum = v["high"].as_u64().unwrap() + v["medium"].as_u64().unwrap() + v["low"].as_u64().unwrap();
        assert_eq!(sum, expected);
    }
}

#[serial_test::serial]
#[test]
fn missing_store_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("svc.toml");
    std::fs::write(
        &cfg_path,
        format!(
            "[store]\npath = \"{}\"\n",
            tmp.path().join("nope.json").display()
        ),
    )
    .unwrap();

    std::env::set_var(ENV_CONFIG_PATH, cfg_path.display().to_string());
    let cfg = ServiceConfig::load_default().unwrap();
    std::env::remove_var(ENV_CONFIG_PATH);

    let err = build_app(&cfg).err().expect("store path does not exist");
    assert!(format!("{err:#}").contains("nope.json"));
}
