//! Snapshot and ingestion handlers.
//!
//! # Status mapping
//! - aggregate endpoints: 200 when overall is UP, 207 when DEGRADED
//! - per-service endpoint: 200 UP, 503 DOWN, 404 for an unknown service

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::health::report::OverallStatus;
use crate::http::server::AppState;
use crate::ingest::IngestError;

fn overall_code(overall: OverallStatus) -> StatusCode {
    match overall {
        OverallStatus::Up => StatusCode::OK,
        OverallStatus::Degraded => StatusCode::MULTI_STATUS,
    }
}

/// GET /health
pub async fn health_summary(State(state): State<AppState>) -> Response {
    let report = match state.summary.fresh(state.freshness) {
        Some(report) => report,
        None => {
            let report = state.aggregator.run_summary().await;
            state.summary.store(report)
        }
    };
    (overall_code(report.overall), Json((*report).clone())).into_response()
}

/// GET /health/details
pub async fn health_details(State(state): State<AppState>) -> Response {
    let report = match state.detailed.fresh(state.freshness) {
        Some(report) => report,
        None => {
            let report = state.aggregator.run_detailed().await;
            state.detailed.store(report)
        }
    };
    (overall_code(report.overall), Json((*report).clone())).into_response()
}

/// GET /health/{service} — always probes fresh.
pub async fn service_health(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Response {
    match state.aggregator.probe(&service) {
        Some(probe) => {
            let result = probe.check().await;
            let code = if result.status.is_up() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (code, Json(result)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            format!("unknown service '{service}'"),
        )
            .into_response(),
    }
}

/// POST /records
pub async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Response {
    match state.ingest.ingest(payload).await {
        Ok(record) => Json(record).into_response(),
        Err(IngestError::EmptyPayload) => {
            (StatusCode::BAD_REQUEST, "empty payload").into_response()
        }
        Err(error) => {
            tracing::error!(%error, "record ingest failed");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}

/// GET /records
pub async fn list_records(State(state): State<AppState>) -> Response {
    match state.ingest.list().await {
        Ok(records) => Json(records).into_response(),
        Err(error) => {
            tracing::error!(%error, "record listing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}
