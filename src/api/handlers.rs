//! HTTP request handlers for the Employer Cost Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::batch::BatchProcessor;
use crate::error::EngineError;

use super::request::{BatchRequest, CalculationRequest};
use super::response::{
    ApiError, ApiErrorResponse, BatchResponse, CalculationResponse, ComparisonResponse,
    RegimeComparison,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/compare", post(compare_handler))
        .route("/batch", post(batch_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else if body_text.contains("unknown variant") {
                ApiError::new("INVALID_INPUT", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn engine_error_response(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a compensation profile and returns its cost breakdown.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match state.calculator().compute(&request.profile) {
        Ok(breakdown) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                correlation_id = %correlation_id,
                regime = %breakdown.regime,
                total_monthly = %breakdown.total_monthly,
                duration_us,
                "Calculation completed successfully"
            );
            let response = CalculationResponse {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                duration_us,
                multiplier: breakdown.multiplier(),
                breakdown,
            };
            json_response(StatusCode::OK, response)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /compare endpoint.
///
/// Computes the same profile under every regime.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match state.calculator().compare(&request.profile) {
        Ok(breakdowns) => {
            info!(
                correlation_id = %correlation_id,
                regimes = breakdowns.len(),
                "Comparison completed successfully"
            );
            let response = ComparisonResponse {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                regimes: breakdowns.into_iter().map(RegimeComparison::from).collect(),
            };
            json_response(StatusCode::OK, response)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /batch endpoint.
///
/// Runs the calculator over the request rows and returns the detail table,
/// the group summary and the skipped rows.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let mut processor =
        BatchProcessor::new(state.calculator().clone()).with_parallelism(request.parallel);
    if let Some(column) = &request.value_column {
        processor = processor.with_value_column(column.clone());
    }

    let start_time = Instant::now();
    let row_count = request.rows.len();
    // Rows are CPU-bound and may fan out over rayon; keep them off the async workers
    let run = tokio::task::spawn_blocking(move || {
        processor.run_batch(
            &request.table(),
            &request.salary_column,
            &request.group_column,
            &request.profile,
        )
    })
    .await;

    match run {
        Ok(Ok(outcome)) => {
            info!(
                correlation_id = %correlation_id,
                rows = row_count,
                errors = outcome.errors.len(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Batch completed successfully"
            );
            let response = BatchResponse {
                batch_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                detail: outcome.detail,
                summary: outcome.summary,
                errors: outcome.errors,
            };
            json_response(StatusCode::OK, response)
        }
        Ok(Err(err)) => engine_error_response(err, correlation_id),
        Err(join_error) => {
            error!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Batch task failed"
            );
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", "Batch processing failed"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompensationProfile, Regime};
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::default()
    }

    async fn post_json(uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn dec(value: &Value) -> Decimal {
        Decimal::from_str(value.as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_default_profile_returns_200() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"profile": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // Verify Content-Type header
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: CalculationResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(result.breakdown.regime, Regime::CltSimples);
        assert_eq!(result.breakdown.total_monthly.round_dp(2), Decimal::from_str("1859.11").unwrap());
        assert_eq!(result.calculation_id.get_version_num(), 4);
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_calculate_presumido_with_net_pay() {
        let body = json!({
            "profile": {
                "base_salary": "3000",
                "regime": "clt_presumido_real",
                "estimate_net_pay": true
            }
        });
        let (status, result) = post_json("/calculate", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let line_items = result["breakdown"]["line_items"].as_array().unwrap();
        let rat = line_items
            .iter()
            .find(|item| item["component"] == "rat")
            .unwrap();
        assert_eq!(dec(&rat["amount"]), Decimal::from(60));
        assert_eq!(rat["label"], "RAT (2%)");
        assert_eq!(
            dec(&result["breakdown"]["net_pay"]["net_salary"]),
            Decimal::from_str("2722.75242").unwrap()
        );
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, error) = post_json("/calculate", "{invalid json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_profile_returns_validation_error() {
        let (status, error) = post_json("/calculate", "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");
        assert!(error["message"].as_str().unwrap().contains("profile"));
    }

    #[tokio::test]
    async fn test_unknown_regime_returns_invalid_input() {
        let (status, error) =
            post_json("/calculate", r#"{"profile": {"regime": "mei"}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_negative_salary_returns_invalid_input() {
        let (status, error) =
            post_json("/calculate", r#"{"profile": {"base_salary": "-100"}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_INPUT");
        assert!(error["message"].as_str().unwrap().contains("base_salary"));
    }

    #[tokio::test]
    async fn test_compare_returns_every_regime() {
        let request = CalculationRequest {
            profile: CompensationProfile::default(),
        };
        let (status, result) =
            post_json("/compare", serde_json::to_string(&request).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        let regimes: Vec<&str> = result["regimes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["regime"].as_str().unwrap())
            .collect();
        assert_eq!(regimes, vec!["clt_simples", "clt_presumido_real", "pj"]);
        assert_eq!(result["regimes"][2]["label"], "PJ");
    }

    #[tokio::test]
    async fn test_batch_skips_bad_rows() {
        let body = json!({
            "rows": [
                {"salary": 3000, "dept": "Eng"},
                {"salary": 5000, "dept": "Eng"},
                {"salary": -1, "dept": "Sales"}
            ],
            "salary_column": "salary",
            "group_column": "dept"
        });
        let (status, result) = post_json("/batch", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["errors"].as_array().unwrap().len(), 1);
        assert_eq!(result["errors"][0]["row_index"], 2);
        assert_eq!(result["detail"]["rows"].as_array().unwrap().len(), 2);
        assert_eq!(
            dec(&result["summary"]["groups"][0]["total"]),
            dec(&result["summary"]["grand_total"])
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_batch_runs_alongside_other_requests() {
        let rows: Vec<Value> = (0..2000)
            .map(|i| json!({"salary": 1500 + i, "dept": format!("d{}", i % 7)}))
            .collect();
        let batch = json!({
            "rows": rows,
            "salary_column": "salary",
            "group_column": "dept",
            "parallel": true
        });
        let calculate = json!({"profile": {"base_salary": "3000"}});

        let ((batch_status, batch_result), (calc_status, _)) = tokio::join!(
            post_json("/batch", batch.to_string()),
            post_json("/calculate", calculate.to_string())
        );

        assert_eq!(batch_status, StatusCode::OK);
        assert_eq!(calc_status, StatusCode::OK);
        assert_eq!(batch_result["detail"]["rows"].as_array().unwrap().len(), 2000);
        assert_eq!(batch_result["summary"]["groups"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_batch_missing_column_returns_400() {
        let body = json!({
            "rows": [{"salary": 3000, "dept": "Eng"}],
            "salary_column": "salary",
            "group_column": "nonexistent"
        });
        let (status, error) = post_json("/batch", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "MISSING_COLUMN");
        assert!(error["message"].as_str().unwrap().contains("nonexistent"));
    }
}
