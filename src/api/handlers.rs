//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use chrono::{Months, NaiveDate};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    GenerationInputs, NetPayInput, NetPayResult, assemble_from_records, assemble_payslip,
    cutoff_for_month, find_active_cycle, generate_batch, generate_payroll, normalize_month,
    recalculate_all, validate_net_pay_input,
};
use crate::config::PayrollDataset;
use crate::error::{EngineError, EngineResult, FieldError};
use crate::models::{
    AuditWarning, BusinessId, CycleType, Employee, EmployeeId, PayrollPolicy, PayslipView,
};
use crate::policy::{resolve_or_default, validate_policy};
use crate::source::{EmailDispatch, PayslipEmailRequest, Sourced};

use super::request::{
    BatchRequest, CutoffQuery, GenerateRequest, PayslipPeriod, PreviewRequest, PreviewRow,
    SendPayslipsRequest, ValidatePolicyRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, BatchResponse, CutoffResponse, GenerateResponse, HealthResponse,
    PayslipResponse, PolicyResponse, PreviewResponse, SendPayslipsResponse,
};
use super::session::SessionContext;
use super::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/payroll/preview", post(preview_handler))
        .route("/payroll/generate", post(generate_handler))
        .route("/payroll/generate-batch", post(generate_batch_handler))
        .route("/policies/validate", post(validate_policy_handler))
        .route("/policies/:business_id", get(policy_handler))
        .route("/cycles/cutoff", get(cutoff_handler))
        .route("/payslips/preview", post(payslip_preview_handler))
        .route("/payslips/send", post(send_payslips_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn parse_json<T: DeserializeOwned>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the bad field
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
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
    Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error))
}

/// Logs an engine failure and converts it for the response.
fn failed(correlation_id: Uuid, error: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    error.into()
}

fn collect_warnings(
    degraded: Option<AuditWarning>,
    rest: impl IntoIterator<Item = AuditWarning>,
) -> Vec<AuditWarning> {
    degraded.into_iter().chain(rest).collect()
}

/// The date range a month's payroll reads attendance for.
///
/// Cutoffs may wrap into the following month, so the window runs to the end
/// of the next month.
fn data_window(month: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = month
        .checked_add_months(Months::new(2))
        .and_then(|d| d.pred_opt())
        .unwrap_or(month);
    (month, end)
}

fn find_employee(employees: &[Employee], employee_id: EmployeeId) -> EngineResult<&Employee> {
    employees
        .iter()
        .find(|e| e.id == employee_id)
        .ok_or(EngineError::EmployeeNotFound { employee_id })
}

fn employees_of_business(data: &PayrollDataset, business_id: BusinessId) -> Vec<EmployeeId> {
    data.employees
        .iter()
        .filter(|e| {
            e.branch_id
                .and_then(|branch_id| data.branches.iter().find(|b| b.id == branch_id))
                .is_some_and(|b| b.business_id == business_id)
        })
        .map(|e| e.id)
        .collect()
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source_policy: state.gateway().policy().to_string(),
    })
}

/// Handler for POST /payroll/preview.
///
/// Runs the net pay calculator over every row with the business's policy,
/// and assembles per-row payslips when a payslip period is given.
async fn preview_handler(
    State(state): State<AppState>,
    session: SessionContext,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> ApiResult<PreviewResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, plan = %session.plan, "Processing payroll preview request");

    session
        .require_payroll_computation()
        .and_then(|_| session.require_payroll_manager())
        .map_err(|e| failed(correlation_id, e))?;
    let request = parse_json(correlation_id, payload)?;
    let wants_payslips = request.payslip_period.is_some();

    let errors: Vec<FieldError> = request
        .rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| {
            let mut errors = match validate_net_pay_input(&row.input()) {
                Err(EngineError::Validation { errors }) => errors,
                _ => Vec::new(),
            };
            if wants_payslips && row.employee_id.is_none() {
                errors.push(FieldError::new("employee_id", "is required for payslips"));
            }
            errors.into_iter().map(move |e| {
                FieldError::new(format!("rows[{}].{}", index, e.field), e.message)
            })
        })
        .collect();
    if !errors.is_empty() {
        return Err(failed(correlation_id, EngineError::Validation { errors }));
    }

    let policies = state
        .gateway()
        .policies()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    let resolved = resolve_or_default(
        &policies.data,
        request.business_id,
        &state.config().default_policy(),
    );

    let inputs: Vec<NetPayInput> = request.rows.iter().map(PreviewRow::input).collect();
    let start_time = Instant::now();
    let rows = recalculate_all(&inputs, &resolved.rates).map_err(|e| failed(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        business_id = request.business_id,
        rows = rows.len(),
        policy_origin = ?resolved.origin,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll preview calculated"
    );

    let mut warnings = collect_warnings(policies.warning, resolved.warnings.clone());
    let payslips = match &request.payslip_period {
        Some(period) => {
            let (payslips, degraded) = preview_payslips(
                &state,
                request.business_id,
                period,
                &request.rows,
                &rows,
            )
            .await
            .map_err(|e| failed(correlation_id, e))?;
            for warning in degraded {
                if !warnings.iter().any(|w| w.code == warning.code) {
                    warnings.push(warning);
                }
            }
            Some(payslips)
        }
        None => None,
    };

    Ok(Json(PreviewResponse {
        policy: resolved,
        rows,
        payslips,
        data_origin: policies.origin,
        warnings,
    }))
}

/// Assembles a payslip for each preview row, paired with its result.
///
/// Returns the payslips and any degradation warnings from the reads.
async fn preview_payslips(
    state: &AppState,
    business_id: BusinessId,
    period: &PayslipPeriod,
    rows: &[PreviewRow],
    results: &[NetPayResult],
) -> EngineResult<(Vec<PayslipView>, Vec<AuditWarning>)> {
    let month = normalize_month(&period.month)?;
    let cycles = state.gateway().cycles().await?;
    let cycle = find_active_cycle(&cycles.data, business_id, period.cycle_type)?;
    let cutoff = cutoff_for_month(month, cycle)?;
    let employees = state.gateway().employees().await?;

    let payslips = rows
        .iter()
        .zip(results)
        .map(|(row, result)| -> EngineResult<PayslipView> {
            let employee_id = row.employee_id.ok_or_else(|| EngineError::InvalidInput {
                field: "employee_id".to_string(),
                message: "is required for payslips".to_string(),
            })?;
            let employee = find_employee(&employees.data, employee_id)?;
            Ok(assemble_payslip(employee, month, cutoff, period.cycle_type, result))
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let warnings = cycles.warning.into_iter().chain(employees.warning).collect();
    Ok((payslips, warnings))
}

/// Handler for GET /policies/:business_id.
async fn policy_handler(
    State(state): State<AppState>,
    Path(business_id): Path<BusinessId>,
) -> ApiResult<PolicyResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, business_id = business_id, "Resolving payroll policy");

    let policies = state
        .gateway()
        .policies()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    let resolved = resolve_or_default(&policies.data, business_id, &state.config().default_policy());

    let warnings = collect_warnings(policies.warning, resolved.warnings.clone());
    Ok(Json(PolicyResponse {
        policy: resolved,
        data_origin: policies.origin,
        warnings,
    }))
}

/// Handler for POST /policies/validate.
///
/// Returns the normalized policy, or 422 with every failing field.
async fn validate_policy_handler(
    State(state): State<AppState>,
    session: SessionContext,
    payload: Result<Json<ValidatePolicyRequest>, JsonRejection>,
) -> ApiResult<PayrollPolicy> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Validating payroll policy");

    session
        .require_payroll_manager()
        .map_err(|e| failed(correlation_id, e))?;
    let request = parse_json(correlation_id, payload)?;

    let existing = state
        .gateway()
        .policies()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    let editing_id = request.editing_id.or(request.draft.id);

    validate_policy(&request.draft, &existing.data, editing_id)
        .map(Json)
        .map_err(|e| failed(correlation_id, e))
}

/// Handler for GET /cycles/cutoff.
async fn cutoff_handler(
    State(state): State<AppState>,
    query: Result<Query<CutoffQuery>, QueryRejection>,
) -> ApiResult<CutoffResponse> {
    let correlation_id = Uuid::new_v4();

    let Query(query) = query.map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
        ApiErrorResponse::new(
            StatusCode::BAD_REQUEST,
            ApiError::new("VALIDATION_ERROR", rejection.body_text()),
        )
    })?;
    info!(
        correlation_id = %correlation_id,
        business_id = query.business_id,
        month = %query.month,
        cycle_type = %query.cycle_type,
        "Computing cutoff"
    );

    let month = normalize_month(&query.month).map_err(|e| failed(correlation_id, e))?;
    let cycle_type = query
        .cycle_type
        .parse::<CycleType>()
        .map_err(|message| {
            failed(
                correlation_id,
                EngineError::InvalidInput {
                    field: "cycle_type".to_string(),
                    message,
                },
            )
        })?;

    let cycles = state
        .gateway()
        .cycles()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    let cycle = find_active_cycle(&cycles.data, query.business_id, cycle_type)
        .map_err(|e| failed(correlation_id, e))?;
    let cutoff = cutoff_for_month(month, cycle).map_err(|e| failed(correlation_id, e))?;

    Ok(Json(CutoffResponse {
        cycle_id: cycle.id,
        cycle_name: cycle.name.clone(),
        cycle_type,
        cutoff,
        data_origin: cycles.origin,
        warnings: cycles.warning.into_iter().collect(),
    }))
}

async fn load_dataset(
    state: &AppState,
    correlation_id: Uuid,
    month: NaiveDate,
) -> Result<Sourced<PayrollDataset>, ApiErrorResponse> {
    let (start, end) = data_window(month);
    state
        .gateway()
        .dataset(start, end)
        .await
        .map_err(|e| failed(correlation_id, e))
}

/// Handler for POST /payroll/generate.
async fn generate_handler(
    State(state): State<AppState>,
    session: SessionContext,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<GenerateResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll generation request");

    session
        .require_payroll_manager()
        .map_err(|e| failed(correlation_id, e))?;
    let request = parse_json(correlation_id, payload)?;
    let month = normalize_month(&request.month).map_err(|e| failed(correlation_id, e))?;

    let dataset = load_dataset(&state, correlation_id, month).await?;
    let data = &dataset.data;
    let employee =
        find_employee(&data.employees, request.employee_id).map_err(|e| failed(correlation_id, e))?;

    let start_time = Instant::now();
    let generation = generate_payroll(
        employee,
        &GenerationInputs::from(data),
        month,
        request.cycle_type,
        state.options(),
    )
    .map_err(|e| failed(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = employee.id,
        records = generation.records.len(),
        net = %(generation.total_earnings() - generation.total_deductions()),
        duration_us = start_time.elapsed().as_micros(),
        "Payroll generated"
    );

    Ok(Json(GenerateResponse {
        generation,
        data_origin: dataset.origin,
        warnings: dataset.warning.into_iter().collect(),
    }))
}

/// Handler for POST /payroll/generate-batch.
async fn generate_batch_handler(
    State(state): State<AppState>,
    session: SessionContext,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<BatchResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch payroll request");

    session
        .require_payroll_manager()
        .map_err(|e| failed(correlation_id, e))?;
    let request = parse_json(correlation_id, payload)?;
    let month = normalize_month(&request.month).map_err(|e| failed(correlation_id, e))?;

    let dataset = load_dataset(&state, correlation_id, month).await?;
    let data = &dataset.data;
    let employee_ids = match (request.employee_ids, request.business_id) {
        (Some(ids), _) => ids,
        (None, Some(business_id)) => employees_of_business(data, business_id),
        (None, None) => data.employees.iter().map(|e| e.id).collect(),
    };

    let batch = generate_batch(
        &data.employees,
        &employee_ids,
        &GenerationInputs::from(data),
        month,
        request.cycle_type,
        state.options(),
    );

    Ok(Json(BatchResponse {
        batch,
        data_origin: dataset.origin,
        warnings: dataset.warning.into_iter().collect(),
    }))
}

/// Handler for POST /payslips/preview.
async fn payslip_preview_handler(
    State(state): State<AppState>,
    session: SessionContext,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<PayslipResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip preview request");

    session
        .require_payroll_manager()
        .map_err(|e| failed(correlation_id, e))?;
    let request = parse_json(correlation_id, payload)?;
    let month = normalize_month(&request.month).map_err(|e| failed(correlation_id, e))?;

    let dataset = load_dataset(&state, correlation_id, month).await?;
    let data = &dataset.data;
    let employee =
        find_employee(&data.employees, request.employee_id).map_err(|e| failed(correlation_id, e))?;

    let generation = generate_payroll(
        employee,
        &GenerationInputs::from(data),
        month,
        request.cycle_type,
        state.options(),
    )
    .map_err(|e| failed(correlation_id, e))?;
    let payslip = assemble_from_records(employee, &generation).map_err(|e| failed(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = employee.id,
        net_pay = %payslip.summary.net_pay,
        "Payslip assembled"
    );

    Ok(Json(PayslipResponse {
        payslip,
        data_origin: dataset.origin,
        warnings: collect_warnings(dataset.warning, generation.warnings),
    }))
}

/// Handler for POST /payslips/send.
///
/// Asks the payroll backend to email payslips; rendering and delivery
/// happen there.
async fn send_payslips_handler(
    State(state): State<AppState>,
    session: SessionContext,
    payload: Result<Json<SendPayslipsRequest>, JsonRejection>,
) -> ApiResult<SendPayslipsResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip email request");

    session
        .require_payroll_manager()
        .map_err(|e| failed(correlation_id, e))?;
    let request = parse_json(correlation_id, payload)?;
    let month = normalize_month(&request.month).map_err(|e| failed(correlation_id, e))?;

    let mailer = state.mailer().ok_or_else(|| {
        failed(
            correlation_id,
            EngineError::SourceUnavailable {
                source_name: "remote".to_string(),
                message: "no payroll backend is configured for sending payslips".to_string(),
            },
        )
    })?;

    let email = PayslipEmailRequest {
        employee_id: request.employee_id,
        business_id: request.business_id,
        branch_id: request.branch_id,
        month,
        payroll_cycle: request.cycle_type,
        ..Default::default()
    };

    let dispatches = match request.employee_id {
        Some(employee_id) => {
            mailer
                .send_single_payslip(&email)
                .await
                .map_err(|e| failed(correlation_id, e))?;
            vec![EmailDispatch {
                employee_id,
                success: true,
                message_id: None,
                error: None,
            }]
        }
        None => mailer
            .send_bulk_payslips(&email)
            .await
            .map_err(|e| failed(correlation_id, e))?,
    };
    info!(
        correlation_id = %correlation_id,
        sent = dispatches.iter().filter(|d| d.success).count(),
        failed = dispatches.iter().filter(|d| !d.success).count(),
        "Payslip emails requested"
    );

    Ok(Json(SendPayslipsResponse { dispatches }))
}
