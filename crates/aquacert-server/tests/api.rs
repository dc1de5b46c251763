//! Integration tests for the certificate REST API

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use aquacert_server::{create_router, CertificateService, MemoryCertificateStore};

/// Helper to create a test app over an empty in-memory store
fn create_test_app() -> Router {
    let store = Arc::new(MemoryCertificateStore::new());
    create_router(CertificateService::new(store))
}

/// Helper to parse JSON response body.
async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON response")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn create(app: &Router, client: &str) -> Value {
    let response = send(
        app,
        "POST",
        "/api/v1/certificates",
        Some(json!({
            "clientName": client,
            "samplePoint": "Reservoir inlet",
            "sampledOn": "2026-03-01",
            "results": [
                { "parameter": "pH", "value": "7.3", "limit": "6.5-9.5" },
                { "parameter": "Nitrate", "value": "8", "unit": "mg/L", "limit": "50" }
            ]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = send(&app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "aquacert-server");
}

#[tokio::test]
async fn test_create_returns_draft() {
    let app = create_test_app();

    let created = create(&app, "Sample A").await;

    assert_eq!(created["status"], "draft");
    assert_eq!(created["clientName"], "Sample A");
    assert_eq!(created["version"], 1);
    assert!(created["id"].as_str().is_some());
    assert!(created["createdAt"].as_str().is_some());
    assert_eq!(created["results"][1]["unit"], "mg/L");
}

#[tokio::test]
async fn test_create_invalid_payload_lists_issues() {
    let app = create_test_app();

    let response = send(
        &app,
        "POST",
        "/api/v1/certificates",
        Some(json!({
            "clientName": "  ",
            "results": [
                { "parameter": "pH", "value": "7.3" },
                { "parameter": "ph", "value": "7.4" }
            ]
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "validation failed");
    assert_eq!(json["issues"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_publish_then_reread() {
    let app = create_test_app();
    let created = create(&app, "Sample A").await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        "POST",
        &format!("/api/v1/certificates/{}/status", id),
        Some(json!({ "status": "published" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &format!("/api/v1/certificates/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reread = json_body(response).await;

    assert_eq!(reread["status"], "published");
    assert_eq!(reread["version"], 2);
    for field in ["id", "clientName", "samplePoint", "sampledOn", "results", "createdAt"] {
        assert_eq!(reread[field], created[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let app = create_test_app();
    let created = create(&app, "Sample A").await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        "POST",
        &format!("/api/v1/certificates/{}/status", id),
        Some(json!({ "status": "unknown" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PATCH",
        &format!("/api/v1/certificates/{}", id),
        Some(json!({ "status": "deleted", "notes": "should not land" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", &format!("/api/v1/certificates/{}", id), None).await;
    let reread = json_body(response).await;
    assert_eq!(reread["status"], "draft");
    assert!(reread["notes"].is_null());
}

#[tokio::test]
async fn test_patch_merges_fields() {
    let app = create_test_app();
    let created = create(&app, "Sample A").await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        "PATCH",
        &format!("/api/v1/certificates/{}", id),
        Some(json!({ "analyst": "M. Lindqvist", "status": "archived" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = json_body(response).await;
    assert_eq!(updated["analyst"], "M. Lindqvist");
    assert_eq!(updated["status"], "archived");
    assert_eq!(updated["clientName"], "Sample A");
    assert_eq!(updated["results"], created["results"]);
}

#[tokio::test]
async fn test_patch_with_stale_version_conflicts() {
    let app = create_test_app();
    let created = create(&app, "Sample A").await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/certificates/{}", id);

    let response = send(&app, "PATCH", &uri, Some(json!({ "notes": "first", "expectedVersion": 1 }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "PATCH", &uri, Some(json!({ "notes": "second", "expectedVersion": 1 }))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let reread = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(reread["notes"], "first");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = create_test_app();
    let uri = "/api/v1/certificates/550e8400-e29b-41d4-a716-446655440000";

    let response = send(&app, "GET", uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "PATCH", uri, Some(json!({ "status": "published" }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_with_summary_and_filter() {
    let app = create_test_app();
    let mut ids = Vec::new();
    for client in ["A", "B", "C", "D", "E", "F"] {
        let created = create(&app, client).await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    for (id, status) in [(&ids[0], "published"), (&ids[1], "published"), (&ids[2], "archived")] {
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/certificates/{}/status", id),
            Some(json!({ "status": status })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = json_body(send(&app, "GET", "/api/v1/certificates", None).await).await;
    assert_eq!(json["certificates"].as_array().unwrap().len(), 6);
    assert_eq!(json["certificates"][0]["clientName"], "F");
    assert_eq!(
        json["summary"],
        json!({ "total": 6, "draftCount": 3, "publishedCount": 2, "archivedCount": 1 })
    );

    let json = json_body(send(&app, "GET", "/api/v1/certificates?status=published", None).await).await;
    let published = json["certificates"].as_array().unwrap();
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|c| c["status"] == "published"));
    assert_eq!(json["summary"]["total"], 6);

    let response = send(&app, "GET", "/api/v1/certificates?status=bogus", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let summary = json_body(send(&app, "GET", "/api/v1/certificates/summary", None).await).await;
    assert_eq!(summary["draftCount"], 3);
    assert_eq!(summary["archivedCount"], 1);
}

#[tokio::test]
async fn test_empty_listing() {
    let app = create_test_app();

    let json = json_body(send(&app, "GET", "/api/v1/certificates", None).await).await;
    assert_eq!(json["certificates"], json!([]));
    assert_eq!(
        json["summary"],
        json!({ "total": 0, "draftCount": 0, "publishedCount": 0, "archivedCount": 0 })
    );
}

#[tokio::test]
async fn test_create_sets_location_header() {
    let app = create_test_app();

    let response = send(
        &app,
        "POST",
        "/api/v1/certificates",
        Some(json!({ "clientName": "Sample A" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Location header");
    let created = json_body(response).await;
    assert_eq!(
        location,
        format!("/api/v1/certificates/{}", created["id"].as_str().unwrap())
    );

    let response = send(&app, "GET", &location, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], created["id"]);
}

#[tokio::test]
async fn test_blank_status_filter_lists_everything() {
    let app = create_test_app();
    let created = create(&app, "A").await;
    create(&app, "B").await;
    let response = send(
        &app,
        "POST",
        &format!("/api/v1/certificates/{}/status", created["id"].as_str().unwrap()),
        Some(json!({ "status": "published" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for uri in ["/api/v1/certificates?status=", "/api/v1/certificates?status=%20"] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let json = json_body(response).await;
        assert_eq!(json["certificates"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["publishedCount"], 1);
    }
}
