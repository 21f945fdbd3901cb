//! Response types for the payroll API.
//!
//! This module defines the success envelopes, the error response structure
//! and the mapping from [`EngineError`] to HTTP statuses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::{BatchGeneration, NetPayResult};
use crate::error::{EngineError, FieldError};
use crate::models::{AuditWarning, Cutoff, CycleId, CycleType, PayrollGeneration, PayslipView};
use crate::policy::ResolvedPolicy;
use crate::source::{DataOrigin, EmailDispatch};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
    /// Per-field failures for validation errors.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            fields: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error listing the failing fields.
    pub fn validation(fields: Vec<FieldError>) -> Self {
        let message = match fields.as_slice() {
            [only] => format!("Invalid value for '{}': {}", only.field, only.message),
            _ => format!("{} fields failed validation", fields.len()),
        };
        Self {
            fields: Some(fields),
            ..Self::new("VALIDATION_ERROR", message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            EngineError::ConfigParseError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            EngineError::InvalidEnvironment { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CONFIG_ERROR", message),
            ),
            EngineError::Configuration { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "CONFIGURATION_ERROR",
                    "Payroll configuration makes the calculation impossible",
                    message,
                ),
            ),
            EngineError::PolicyNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("POLICY_NOT_FOUND", message),
            ),
            EngineError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::UnassignedEmployee { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("UNASSIGNED_EMPLOYEE", message),
            ),
            EngineError::SalaryRateNotFound { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("SALARY_RATE_NOT_FOUND", message),
            ),
            EngineError::CycleNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("CYCLE_NOT_FOUND", message),
            ),
            EngineError::InvalidInput { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::validation(vec![FieldError::new(field, message)]),
            ),
            EngineError::Validation { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::validation(errors),
            ),
            EngineError::Forbidden { message } => {
                (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
            }
            EngineError::SourceUnavailable { source_name, message } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details(
                    "SOURCE_UNAVAILABLE",
                    format!("Data source '{}' is unavailable", source_name),
                    message,
                ),
            ),
            EngineError::CalculationError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Response for `POST /payroll/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// The rates every row was calculated with.
    pub policy: ResolvedPolicy,
    /// One result per request row, in order.
    pub rows: Vec<NetPayResult>,
    /// One payslip per row when a payslip period was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payslips: Option<Vec<PayslipView>>,
    /// Where the policy was read from.
    pub data_origin: DataOrigin,
    /// Degradation and default-policy warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Response for `GET /policies/:business_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    /// The resolved policy.
    pub policy: ResolvedPolicy,
    /// Where the policies were read from.
    pub data_origin: DataOrigin,
    /// Degradation and default-policy warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Response for `GET /cycles/cutoff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffResponse {
    /// The cycle used.
    pub cycle_id: CycleId,
    /// Its display name.
    pub cycle_name: String,
    /// Its type.
    pub cycle_type: CycleType,
    /// The cutoff window.
    pub cutoff: Cutoff,
    /// Where the cycles were read from.
    pub data_origin: DataOrigin,
    /// Degradation warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Response for `POST /payroll/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated payroll.
    pub generation: PayrollGeneration,
    /// Where the inputs were read from.
    pub data_origin: DataOrigin,
    /// Degradation warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Response for `POST /payroll/generate-batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// The batch outcome.
    pub batch: BatchGeneration,
    /// Where the inputs were read from.
    pub data_origin: DataOrigin,
    /// Degradation warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Response for `POST /payslips/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipResponse {
    /// The assembled payslip.
    pub payslip: PayslipView,
    /// Where the inputs were read from.
    pub data_origin: DataOrigin,
    /// Generation and degradation warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Response for `POST /payslips/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendPayslipsResponse {
    /// Per-employee outcomes; a single send reports one entry.
    pub dispatches: Vec<EmailDispatch>,
}

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the service is up.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Active source policy.
    pub source_policy: String,
}
