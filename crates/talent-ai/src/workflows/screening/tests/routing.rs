use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn evaluation_payload(candidate_id: &str) -> Value {
    serde_json::to_value(evaluation_request(candidate_id, strong_evidence())).expect("payload")
}

#[tokio::test]
async fn evaluation_endpoint_returns_expanded_view() {
    let (service, _repository) = build_service();
    let app = router_with_service(service);

    let response = app
        .oneshot(post_json(
            "/api/v1/screening/evaluations",
            &evaluation_payload("cand-1"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["candidate_id"], "cand-1");
    assert_eq!(body["status"], "QUALIFIED");
    assert_eq!(body["overall_score"], 92);
    assert_eq!(body["match_level"], "PERFECT");
    assert_eq!(body["breakdown"]["bonusPoints"], 5.0);
    assert!(body.get("rejection_reasons").is_none());
}

#[tokio::test]
async fn invalid_role_maps_to_unprocessable_entity() {
    let (service, repository) = build_service();
    let app = router_with_service(service);

    let mut payload = evaluation_payload("cand-1");
    payload["role"]["skills"][0]["weight"] = json!(0);

    let response = app
        .oneshot(post_json("/api/v1/screening/evaluations", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("outside the allowed range")));
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn unknown_candidate_returns_not_found_payload() {
    let (service, _repository) = build_service();
    let app = router_with_service(service);

    let response = app
        .oneshot(get(
            "/api/v1/screening/roles/backend-engineer/candidates/ghost",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["candidate_id"], "ghost");
}

#[tokio::test]
async fn ranking_endpoint_lists_best_candidates_first() {
    let (service, _repository) = build_service();

    let mut rejected = strong_evidence();
    rejected.education_met = Some(false);
    service
        .evaluate(evaluation_request("cand-low", rejected))
        .expect("evaluation succeeds");
    service
        .evaluate(evaluation_request("cand-top", strong_evidence()))
        .expect("evaluation succeeds");

    let app = router_with_service(service);
    let response = app
        .oneshot(get("/api/v1/screening/roles/backend-engineer/candidates"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let rows = body.as_array().expect("array of rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["candidate_id"], "cand-top");
    assert_eq!(rows[1]["candidate_id"], "cand-low");
    assert_eq!(rows[1]["status"], "REJECTED");
}

#[tokio::test]
async fn batch_endpoint_scores_every_candidate() {
    let (service, repository) = build_service();
    let app = router_with_service(service);

    let evidence = serde_json::to_value(strong_evidence()).expect("evidence");
    let payload = json!({
        "role_id": "backend-engineer",
        "role": serde_json::to_value(backend_role()).expect("role"),
        "candidates": [
            { "candidate_id": "cand-2", "evidence": evidence.clone() },
            { "candidate_id": "cand-1", "evidence": evidence },
        ],
    });

    let response = app
        .oneshot(post_json("/api/v1/screening/batches", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let scored = body["scored"].as_array().expect("scored rows");
    assert_eq!(scored.len(), 2);
    assert_eq!(scored[0]["candidate_id"], "cand-1");
    assert!(body["failures"].as_array().is_some_and(Vec::is_empty));
    assert_eq!(repository.len(), 2);
}
