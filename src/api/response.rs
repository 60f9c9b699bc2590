//! Response types for the Employer Cost Engine API.
//!
//! This module defines the success bodies of each endpoint and the error
//! response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{CostBreakdown, DetailTable, GroupSummary, Regime, RowError};

/// Body of a successful `/calculate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Calculation duration in microseconds.
    pub duration_us: u64,
    /// Extra monthly cost per unit of salary.
    pub multiplier: Decimal,
    /// The full breakdown.
    pub breakdown: CostBreakdown,
}

/// One regime's result inside a `/compare` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparison {
    /// The regime.
    pub regime: Regime,
    /// Display label of the regime.
    pub label: String,
    /// Extra monthly cost per unit of salary.
    pub multiplier: Decimal,
    /// The full breakdown under this regime.
    pub breakdown: CostBreakdown,
}

impl From<CostBreakdown> for RegimeComparison {
    fn from(breakdown: CostBreakdown) -> Self {
        Self {
            regime: breakdown.regime,
            label: breakdown.regime.label().to_string(),
            multiplier: breakdown.multiplier(),
            breakdown,
        }
    }
}

/// Body of a successful `/compare` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResponse {
    /// Unique identifier for this comparison.
    pub calculation_id: Uuid,
    /// When the comparison was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the comparison.
    pub engine_version: String,
    /// One entry per regime.
    pub regimes: Vec<RegimeComparison>,
}

/// Body of a successful `/batch` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Unique identifier for this batch run.
    pub batch_id: Uuid,
    /// When the batch was run.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that ran the batch.
    pub engine_version: String,
    /// Per-employee detail.
    pub detail: DetailTable,
    /// Consolidated totals by group.
    pub summary: GroupSummary,
    /// Rows that were skipped.
    pub errors: Vec<RowError>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("Check the value of '{}' in the profile", field),
                ),
            },
            EngineError::MissingColumn { column } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "MISSING_COLUMN",
                    message,
                    format!("No row schema contains a column named '{}'", column),
                ),
            },
            EngineError::Aggregation { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "AGGREGATION_ERROR",
                    message,
                    "The value column must be numeric in every computed row",
                ),
            },
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::Io { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("IO_ERROR", "I/O error", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::CostCalculator;
    use crate::models::CompensationProfile;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let api_error: ApiErrorResponse =
            EngineError::invalid_input("base_salary", "must not be negative").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_INPUT");
        assert!(api_error.error.message.contains("base_salary"));
    }

    #[test]
    fn test_missing_column_maps_to_bad_request() {
        let api_error: ApiErrorResponse = EngineError::MissingColumn {
            column: "depto".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "MISSING_COLUMN");
    }

    #[test]
    fn test_config_and_io_errors_map_to_server_error() {
        let config: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "statutory.yaml".to_string(),
        }
        .into();
        let io: ApiErrorResponse = EngineError::Io {
            path: "out.csv".to_string(),
            message: "denied".to_string(),
        }
        .into();

        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(config.error.code, "CONFIG_ERROR");
        assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(io.error.code, "IO_ERROR");
    }

    #[test]
    fn test_regime_comparison_from_breakdown() {
        let breakdown = CostCalculator::default()
            .compute(&CompensationProfile::default())
            .unwrap();
        let comparison = RegimeComparison::from(breakdown.clone());

        assert_eq!(comparison.regime, Regime::CltSimples);
        assert_eq!(comparison.label, "CLT (Simples Nacional)");
        assert_eq!(comparison.multiplier, breakdown.multiplier());
    }
}
