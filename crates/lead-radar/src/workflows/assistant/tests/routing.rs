use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::assistant::router::{snapshot_handler, SnapshotRequest};
use crate::workflows::assistant::assistant_router;

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let router = assistant_router(Arc::new(engine()));
    let response = router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn snapshot_route_returns_payload() {
    let (status, body) = post_json("/api/v1/assistant/snapshot", request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["today"], "2024-05-10");
    assert_eq!(body["due_today"][0]["id"], "l1");
    assert_eq!(body["scores"][0]["score"], 49);
    assert!(body["messages"]["l1"]["professional"]
        .as_str()
        .unwrap()
        .contains("João"));
    assert_eq!(body["summary"]["dropped_rows"]["leads"], 1);
}

#[tokio::test]
async fn snapshot_route_honors_score_limit() {
    let mut request = request_body();
    request["score_limit"] = json!(2);
    let (status, body) = post_json("/api/v1/assistant/snapshot", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scores"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn snapshot_route_rejects_non_array_tables() {
    let mut request = request_body();
    request["leads"] = json!({ "id": "l1" });
    let (status, body) = post_json("/api/v1/assistant/snapshot", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("leads"));
}

#[tokio::test]
async fn ask_route_answers_questions() {
    let mut request = request_body();
    request["question"] = json!("Quais leads estão atrasados?");
    let (status, body) = post_json("/api/v1/assistant/ask", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"]["kind"], "overdue");
    assert_eq!(body["lead_ids"], json!(["l2"]));
}

#[tokio::test]
async fn snapshot_handler_reports_unknown_timezone() {
    let request = SnapshotRequest {
        rows: rows(),
        now: Some(now()),
        timezone: Some("Nowhere/Land".to_string()),
        score_limit: None,
    };

    let result = snapshot_handler(State(Arc::new(engine())), axum::Json(request)).await;
    let error = result.expect_err("unknown timezone");
    assert!(error.to_string().contains("Nowhere/Land"));
}
