use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::repository::{CandidateId, RepositoryError, ScreeningRecord, ScreeningRepository};
use super::role::RoleId;
use super::service::{BatchRequest, EvaluationRequest, ScreeningService, ScreeningServiceError};

/// Router builder exposing HTTP endpoints for evaluation and result lookup.
pub fn screening_router<R>(service: Arc<ScreeningService<R>>) -> Router
where
    R: ScreeningRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/screening/evaluations",
            post(evaluate_handler::<R>),
        )
        .route("/api/v1/screening/batches", post(batch_handler::<R>))
        .route(
            "/api/v1/screening/roles/:role_id/candidates",
            get(ranking_handler::<R>),
        )
        .route(
            "/api/v1/screening/roles/:role_id/candidates/:candidate_id",
            get(record_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    match service.evaluate(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.expanded_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn batch_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || service.evaluate_batch(request)).await;

    match outcome {
        Ok(Ok(outcome)) => {
            let payload = json!({
                "scored": outcome.table(),
                "failures": outcome.failures,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(Err(err)) => error_response(err),
        Err(join_error) => {
            error!(error = %join_error, "batch evaluation task failed");
            let payload = json!({ "error": "batch evaluation failed" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(role_id): Path<String>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    match service.ranking(&RoleId(role_id)) {
        Ok(records) => {
            let rows: Vec<_> = records.iter().map(ScreeningRecord::table_view).collect();
            (StatusCode::OK, axum::Json(rows)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path((role_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    match service.get(&RoleId(role_id), &CandidateId(candidate_id.clone())) {
        Ok(record) => (StatusCode::OK, axum::Json(record.expanded_view())).into_response(),
        Err(ScreeningServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "candidate_id": candidate_id,
                "error": "no evaluation recorded for this candidate",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: ScreeningServiceError) -> Response {
    let status = match &err {
        ScreeningServiceError::InvalidRole(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Extraction(extraction) if extraction.is_retryable() => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ScreeningServiceError::Extraction(_) => StatusCode::BAD_GATEWAY,
        ScreeningServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
