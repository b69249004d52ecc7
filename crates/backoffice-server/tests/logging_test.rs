//! Las credenciales nunca llegan a los logs.

mod helpers;

use axum::http::StatusCode;
use helpers::{CapturedLogs, SERVICE_KEY, TestApp};
use serde_json::json;

const COMPOSITE_HEADERS: [(&str, &str); 3] = [
    ("partner-id", "p1"),
    ("origin", "https://a.com"),
    ("authorization", SERVICE_KEY),
];

#[tokio::test]
async fn unreachable_store_logs_without_credentials() {
    let (logs, _guard) = CapturedLogs::install();
    let app = TestApp::with_failing_store();
    app.seed("acme", "first").await;

    app.client
        .get_with_headers("/partner-config", &[("authorization", SERVICE_KEY)])
        .await
        .assert_status(StatusCode::OK);
    app.client
        .get_with_headers("/partner-config", &COMPOSITE_HEADERS)
        .await
        .assert_status(StatusCode::OK);

    let output = logs.contents();
    assert!(output.contains("Cache read failed"));
    assert!(output.contains("Cache write failed"));
    assert!(!output.contains(SERVICE_KEY), "credential leaked:\n{output}");
}

#[tokio::test]
async fn cache_round_trip_logs_without_credentials() {
    let (logs, _guard) = CapturedLogs::install();
    let app = TestApp::new();
    app.seed("acme", "first").await;

    // miss + store, hit, then a write that invalidates
    for _ in 0..2 {
        app.client
            .get_with_headers("/partner-config", &COMPOSITE_HEADERS)
            .await
            .assert_status(StatusCode::OK);
    }
    app.client
        .post_json(
            "/partner-config",
            &[("authorization", SERVICE_KEY)],
            json!({"name": "globex", "description": "second"}),
        )
        .await
        .assert_status(StatusCode::CREATED);

    let output = logs.contents();
    assert!(output.contains("Cache hit"));
    assert!(!output.contains(SERVICE_KEY), "credential leaked:\n{output}");
}
