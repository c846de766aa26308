//! Resource API routing tests

mod helpers;

use eegdash_client::ApiError;
use eegdash_common::models::{JobStatus, Priority};
use helpers::{client, FakeBackend};
use serde_json::json;

#[tokio::test]
async fn test_delete_analysis_routes_by_status() {
    let backend = FakeBackend::start().await;
    backend.respond("DELETE", "/queue/10", 200, json!({"message": "Job cancelled"}));
    backend.respond("DELETE", "/queue/11", 200, json!({"message": "Job cancelled"}));
    for id in [12, 13, 14] {
        backend.respond(
            "DELETE",
            &format!("/results/{}", id),
            200,
            json!({"message": "Result deleted"}),
        );
    }
    let (ctx, _) = client(&backend);

    let cases = [
        (10, JobStatus::Queued, "/queue/10"),
        (11, JobStatus::Processing, "/queue/11"),
        (12, JobStatus::Completed, "/results/12"),
        (13, JobStatus::Failed, "/results/13"),
        (14, JobStatus::Cancelled, "/results/14"),
    ];
    for (id, status, path) in cases {
        ctx.api.analysis.delete_analysis(id, &status).await.unwrap();
        assert_eq!(backend.requests_to("DELETE", path).len(), 1, "{}", path);
    }
    assert_eq!(backend.requests().len(), 5);
}

#[tokio::test]
async fn test_zero_id_refused_without_request() {
    let backend = FakeBackend::start().await;
    let (ctx, _) = client(&backend);

    let err = ctx
        .api
        .analysis
        .delete_analysis(0, &JobStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidIdentifier(_)));
    assert_eq!(err.to_string(), "Invalid analysis ID");

    assert!(ctx.api.results.get_result(0).await.is_err());
    assert!(ctx.api.reports.download_report(0).await.is_err());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_classification_body() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "/classify",
        202,
        json!({"message": "Classification started", "job_id": 3, "status": "queued"}),
    );
    let (ctx, _) = client(&backend);

    let accepted = ctx
        .api
        .analysis
        .start_classification("20240501_rec.edf", "PT-9", &Priority::Routine)
        .await
        .unwrap();
    assert_eq!(accepted.job_id, 3);

    let recorded = &backend.requests_to("POST", "/classify")[0];
    assert_eq!(
        recorded.body,
        Some(json!({"filename": "20240501_rec.edf", "patient_id": "PT-9", "priority": "routine"}))
    );
}

#[tokio::test]
async fn test_priority_update_body() {
    let backend = FakeBackend::start().await;
    backend.respond("PUT", "/queue/8/priority", 200, json!({"message": "Priority updated"}));
    let (ctx, _) = client(&backend);

    let reply = ctx
        .api
        .analysis
        .update_priority(8, &Priority::Urgent)
        .await
        .unwrap();
    assert_eq!(reply.message, "Priority updated");

    let recorded = &backend.requests_to("PUT", "/queue/8/priority")[0];
    assert_eq!(recorded.body, Some(json!({"priority": "urgent"})));
}

#[tokio::test]
async fn test_results_decode_nested_result() {
    let backend = FakeBackend::start().await;
    let mut job = helpers::job_json(21, "completed");
    job["result"] = json!({
        "id": 99,
        "job_id": 21,
        "primary_diagnosis": "epilepsy",
        "confidence": 93.5,
        "risk_level": "high"
    });
    backend.respond("GET", "/results/21", 200, job);
    let (ctx, _) = client(&backend);

    let fetched = ctx.api.results.get_result(21).await.unwrap();
    let result = fetched.result.unwrap();
    assert_eq!(result.id, 99);
    assert_eq!(result.primary_diagnosis, "epilepsy");
    assert_eq!(fetched.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_validation_error_message() {
    let backend = FakeBackend::start().await;
    backend.respond("POST", "/predict", 400, json!({"error": "file_path is required"}));
    let (ctx, _) = client(&backend);

    let err = ctx.api.analysis.predict("", "PT-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { status: 400, .. }));
    assert_eq!(err.to_string(), "file_path is required");
}
