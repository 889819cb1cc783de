//! HTTP Route Tests
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`:
//! - Intake, item update, station matching and statistics over JSON
//! - Error bodies carry stable codes and the mapped HTTP status

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use vetrecon::http_server::{ApiState, HttpServer, HttpServerConfig};
use vetrecon::records_request::FormReferenceGenerator;
use vetrecon::reference::{HazardReferenceStore, ReferenceHandle, ReferenceLoader};
use vetrecon::service::ReconstructionService;
use vetrecon::store::InMemoryStore;

// =============================================================================
// Test Utilities
// =============================================================================

fn router() -> Router {
    let reference = HazardReferenceStore::new(ReferenceLoader::builtin().unwrap()).unwrap();
    let service = ReconstructionService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(ReferenceHandle::new(reference)),
        Arc::new(FormReferenceGenerator::default()),
    );
    let state = Arc::new(ApiState::new(Arc::new(service), None));
    HttpServer::build_router(&HttpServerConfig::default(), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn army_profile() -> Value {
    json!({
        "branch": "army",
        "service_period": {"start": "2004-01-01", "end": "2011-12-31"},
        "primary_occupation": "11B",
        "deployments": ["OIF"]
    })
}

async fn create(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/reconstructions",
        Some(json!({"profile": army_profile(), "veteran_name": "Pat Doe"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["reconstruction_id"].as_str().unwrap().to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health_and_reference() {
    let app = router();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/reference", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checksum"].as_str().unwrap().len(), 8);
    assert!(body["entry_count"].as_u64().unwrap() > 0);

    let (status, reloaded) = send(&app, "POST", "/reference/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded["checksum"], body["checksum"]);
}

#[tokio::test]
async fn test_initialize_and_fetch_tree() {
    let app = router();
    let id = create(&app).await;

    let (status, tree) = send(&app, "GET", &format!("/reconstructions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree["categories"].as_array().unwrap().len(), 9);
    assert_eq!(tree["reconstruction"]["state"]["lifecycle"], "initialized");
    assert!(tree["gap_message"].as_str().unwrap().contains("80%"));

    let (status, list) = send(&app, "GET", "/reconstructions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_invalid_profile_is_bad_request() {
    let app = router();
    let (status, body) = send(
        &app,
        "POST",
        "/reconstructions",
        Some(json!({"profile": {"branch": "navy"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["code"].as_str().unwrap().starts_with("VREC_"));
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_item_update_cascades() {
    let app = router();
    let id = create(&app).await;
    let (_, tree) = send(&app, "GET", &format!("/reconstructions/{}", id), None).await;
    let item_id = tree["categories"][0]["items"][0]["id"].as_str().unwrap().to_string();

    let (status, result) = send(
        &app,
        "PATCH",
        &format!("/items/{}", item_id),
        Some(json!({"status": "verified", "notes": "certified copy"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["item"]["status"], "verified");
    assert_eq!(result["category"]["completed_items"], 1);
    assert_eq!(result["state"]["completed_documents"], 1);
    assert_eq!(result["state"]["lifecycle"], "in_progress");
}

#[tokio::test]
async fn test_station_matching_and_statistics() {
    let app = router();
    let id = create(&app).await;

    let (status, result) = send(
        &app,
        "POST",
        &format!("/reconstructions/{}/duty-stations", id),
        Some(json!({
            "name": "Camp Taji",
            "location": {"latitude": 33.5274, "longitude": 44.2569},
            "period": {"start": "2006-02-01", "end": "2006-11-30"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(result["hazards_found"].as_u64().unwrap() >= 1);
    let assignment_id = result["assignment_id"].as_str().unwrap().to_string();

    let (status, rematched) = send(
        &app,
        "POST",
        &format!("/assignments/{}/rematch", assignment_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rematched["hazards_found"], result["hazards_found"]);

    let (status, stats) = send(
        &app,
        "GET",
        &format!("/reconstructions/{}/statistics", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats["presumptive_exposure_count"].as_u64().unwrap() >= 1);
    assert_eq!(stats["highest_severity"], "extreme");
    assert_eq!(stats["occupational_exposure_count"], 1);
}

#[tokio::test]
async fn test_records_request_routes() {
    let app = router();
    let id = create(&app).await;

    let (status, issued) = send(
        &app,
        "POST",
        &format!("/reconstructions/{}/records-requests/missing", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let first = &issued.as_array().unwrap()[0];
    let request_id = first["id"].as_str().unwrap().to_string();
    assert_eq!(first["status"], "pending");

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/records-requests/{}", request_id),
        Some(json!({"status": "acknowledged"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "acknowledged");

    let (status, regenerated) = send(
        &app,
        "POST",
        &format!("/records-requests/{}/regenerate", request_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regenerated["form_artifact_ref"], first["form_artifact_ref"]);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/reconstructions/{}/records-requests", id),
        Some(json!({"request_type": "foia", "documents": []})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VREC_REQUEST_EMPTY");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = router();

    let (status, body) = send(
        &app,
        "GET",
        "/reconstructions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "VREC_NOT_FOUND");

    let (status, body) = send(&app, "GET", "/reconstructions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VREC_INVALID_INPUT");
}
