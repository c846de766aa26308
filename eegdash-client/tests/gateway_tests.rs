//! Request gateway behaviour against a live HTTP server

mod helpers;

use eegdash_client::api::{EegDataQuery, QueueQuery};
use eegdash_client::{ApiError, Gateway, RequestOptions};
use eegdash_common::models::User;
use eegdash_common::storage::{DurableStorage, TOKEN_KEY, USER_KEY};
use eegdash_common::ClientEvent;
use helpers::{client, FakeBackend};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;

fn dashboard_body() -> Value {
    json!({
        "stats": {"files_processed_today": 1, "pending_analyses": 0,
                  "accuracy_rate": 90.0, "avg_processing_time": 2.0},
        "recent_analyses": [],
        "queue_status": []
    })
}

#[tokio::test]
async fn test_no_bearer_without_token() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/dashboard", 200, dashboard_body());
    let (ctx, _) = client(&backend);

    ctx.api.dashboard.get_dashboard().await.unwrap();

    let requests = backend.requests_to("GET", "/dashboard");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_bearer_from_persisted_token() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/dashboard", 200, dashboard_body());
    let (ctx, storage) = client(&backend);
    storage.set(TOKEN_KEY, "persisted-token").unwrap();

    ctx.api.dashboard.get_dashboard().await.unwrap();

    let requests = backend.requests_to("GET", "/dashboard");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer persisted-token")
    );
}

#[tokio::test]
async fn test_unauthorized_clears_session_once() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/results", 401, json!({"error": "Invalid token"}));
    let (ctx, storage) = client(&backend);

    let user: User = serde_json::from_value(helpers::user_json()).unwrap();
    ctx.session.state().establish("stale", &user).unwrap();
    let mut events = ctx.events.subscribe();

    let err = ctx.api.results.get_results().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.to_string(), "Unauthorized");
    assert!(!ctx.session.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);

    match events.try_recv() {
        Ok(ClientEvent::LoginRequired { path, .. }) => assert_eq!(path, "/results"),
        other => panic!("expected LoginRequired, got {:?}", other),
    }
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_server_error_message_surfaces() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/stats", 500, json!({"error": "Failed to compute stats"}));
    let (ctx, _) = client(&backend);

    let err = ctx.api.dashboard.get_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 500, .. }));
    assert_eq!(err.to_string(), "Failed to compute stats");
}

#[tokio::test]
async fn test_malformed_error_body_falls_back_to_status() {
    let backend = FakeBackend::start().await;
    backend.respond_raw("GET", "/stats", 502, "text/html", b"<html>Bad Gateway</html>".to_vec());
    let (ctx, _) = client(&backend);

    let err = ctx.api.dashboard.get_stats().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
}

#[tokio::test]
async fn test_unparseable_success_is_parse_error() {
    let backend = FakeBackend::start().await;
    backend.respond_raw("GET", "/stats", 200, "text/plain", b"ok".to_vec());
    let (ctx, _) = client(&backend);

    let err = ctx.api.dashboard.get_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/health", 200, json!({"status": "healthy"}));
    let (ctx, storage) = client(&backend);
    storage.set(TOKEN_KEY, "abc").unwrap();

    let gateway = Gateway::new(
        backend.base_url.as_str(),
        ctx.session.state().clone(),
        ctx.events.clone(),
    )
    .unwrap();
    let options = RequestOptions::new(Method::GET)
        .header("Content-Type", "text/plain")
        .header("Authorization", "Bearer override");
    let _: Value = gateway.request("/health", options).await.unwrap();

    let recorded = &backend.requests_to("GET", "/health")[0];
    assert_eq!(recorded.content_type.as_deref(), Some("text/plain"));
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer override"));
}

#[tokio::test]
async fn test_queue_query_skips_all() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/queue", 200, json!({"jobs": [], "total": 0}));
    let (ctx, _) = client(&backend);

    let query = QueueQuery {
        status: Some("all".to_string()),
        priority: Some("urgent".to_string()),
        search: None,
    };
    ctx.api.analysis.get_queue(&query).await.unwrap();
    ctx.api.analysis.get_queue(&QueueQuery::default()).await.unwrap();

    let requests = backend.requests_to("GET", "/queue");
    assert_eq!(requests[0].query.as_deref(), Some("priority=urgent"));
    assert_eq!(requests[1].query, None);
}

#[tokio::test]
async fn test_eeg_data_always_sends_limit() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/eeg/data/S001",
        200,
        json!({"subject_id": "S001", "data_points": [], "count": 0}),
    );
    let (ctx, _) = client(&backend);

    ctx.api
        .eeg
        .get_eeg_data("S001", &EegDataQuery::default())
        .await
        .unwrap();

    let requests = backend.requests_to("GET", "/eeg/data/S001");
    assert_eq!(requests[0].query.as_deref(), Some("limit=1000"));
}

#[tokio::test]
async fn test_invalid_subject_id_never_dispatched() {
    let backend = FakeBackend::start().await;
    let (ctx, _) = client(&backend);

    let err = ctx.api.eeg.delete_eeg_data("../etc").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidIdentifier(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_download_returns_raw_bytes() {
    let backend = FakeBackend::start().await;
    backend.respond_raw(
        "GET",
        "/reports/4/download",
        200,
        "application/pdf",
        b"%PDF-1.4 report".to_vec(),
    );
    let (ctx, storage) = client(&backend);
    storage.set(TOKEN_KEY, "abc").unwrap();

    let bytes = ctx.api.reports.download_report(4).await.unwrap();
    assert_eq!(bytes, b"%PDF-1.4 report");

    let recorded = &backend.requests_to("GET", "/reports/4/download")[0];
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn test_download_failure_uses_status_fallback() {
    let backend = FakeBackend::start().await;
    backend.respond_raw("GET", "/reports/4/download", 404, "text/plain", b"missing".to_vec());
    let (ctx, _) = client(&backend);

    let err = ctx.api.reports.download_report(4).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404");
}

#[tokio::test]
async fn test_network_failure() {
    // Nothing listens on this port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let storage = std::sync::Arc::new(eegdash_common::MemoryStorage::new());
    let ctx = eegdash_client::ClientContext::with_storage(&format!("http://{}/api", addr), storage)
        .unwrap();

    let err = ctx.api.auth.check_health().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
