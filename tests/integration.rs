//! Integration tests for the payroll engine API.
//!
//! This test suite drives the router against the stub dataset in
//! `config/default`:
//! - Payroll preview (net pay calculator over rows)
//! - Policy resolution and validation
//! - Cutoff windows, including a cycle that wraps into the next month
//! - Single and batch payroll generation
//! - Payslip assembly
//! - Session restrictions
//! - Degradation to fallback data when the backend is down

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, PLAN_HEADER, ROLE_HEADER, create_router};
use payroll_engine::config::{AppConfig, ConfigLoader};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(load_config()))
}

fn create_router_with_backend(base_url: &str) -> Router {
    let app = AppConfig::from_lookup(|key| match key {
        "PAYROLL_API_BASE_URL" => Some(base_url.to_string()),
        "PAYROLL_API_TOKEN" => Some("test-token".to_string()),
        "PAYROLL_API_TIMEOUT_SECS" => Some("2".to_string()),
        _ => None,
    })
    .unwrap();
    create_router(AppState::from_app_config(&app, load_config()).unwrap())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized as a JSON string.
fn amount(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap_or_else(|| panic!("not a decimal string: {}", value)))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post_json(
    router: Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(router, builder.body(Body::from(body.to_string())).unwrap()).await
}

fn record_amount(generation: &Value, code: &str) -> Option<Decimal> {
    generation["records"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["code"] == code)
        .map(|r| amount(&r["amount"]))
}

fn warning_codes(body: &Value) -> Vec<String> {
    body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

const ENTERPRISE: (&str, &str) = (PLAN_HEADER, "ENTERPRISE");

// =============================================================================
// SECTION 1: Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_source_policy() {
    let (status, body) = get_json(create_router_for_test(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["source_policy"], "FALLBACK");
}

// =============================================================================
// SECTION 2: Payroll Preview
// =============================================================================

#[tokio::test]
async fn test_preview_worked_scenario() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 1,
            "rows": [{
                "basic_salary": "50000",
                "days_worked": "22",
                "overtime_hours": "5",
                "deductions": "2500"
            }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let row = &body["rows"][0];
    assert_eq!(amount(&row["daily_rate"]), decimal("2272.73"));
    assert_eq!(amount(&row["gross_for_days_worked"]), decimal("50000.00"));
    assert_eq!(amount(&row["overtime_pay"]), decimal("1775.57"));
    assert_eq!(amount(&row["gross_pay"]), decimal("51775.57"));
    assert_eq!(amount(&row["net_pay"]), decimal("49275.57"));
    assert_eq!(body["policy"]["origin"], "CONFIGURED");
    assert_eq!(body["data_origin"], "FALLBACK");
    assert!(body.get("payslips").is_none());
    assert!(warning_codes(&body).is_empty());
}

#[tokio::test]
async fn test_preview_multiple_rows_in_order() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 1,
            "rows": [
                {"basic_salary": "22000", "days_worked": "11"},
                {"basic_salary": "44000", "days_worked": "22", "overtime_hours": "2"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(amount(&rows[0]["net_pay"]), decimal("11000.00"));
    // 44000 / 22 / 8 = 250 × 1.25 × 2
    assert_eq!(amount(&rows[1]["overtime_pay"]), decimal("625.00"));
    assert_eq!(amount(&rows[1]["net_pay"]), decimal("44625.00"));
}

#[tokio::test]
async fn test_preview_for_business_without_policy_warns() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 2,
            "rows": [{"basic_salary": "22000", "days_worked": "22"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"]["origin"], "DEFAULT");
    assert_eq!(warning_codes(&body), vec!["DEFAULT_POLICY"]);
}

#[tokio::test]
async fn test_preview_negative_days_is_field_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 1,
            "rows": [{"basic_salary": "22000", "days_worked": "-3"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["fields"][0]["field"], "rows[0].days_worked");
}

#[tokio::test]
async fn test_preview_with_payslips_per_employee() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 1,
            "rows": [
                {"employee_id": 1, "basic_salary": "50000", "days_worked": "22",
                 "overtime_hours": "5", "deductions": "2500"},
                {"employee_id": 2, "basic_salary": "22000", "days_worked": "11"}
            ],
            "payslip_period": {"month": "2025-02", "cycle_type": "SEMI_2"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let payslips = body["payslips"].as_array().unwrap();
    assert_eq!(payslips.len(), 2);

    let alice = &payslips[0];
    assert_eq!(alice["employee_name"], "Alice Wonderland");
    assert_eq!(alice["period"]["start"], "2025-02-16");
    assert_eq!(alice["period"]["end"], "2025-02-28");
    assert_eq!(alice["earnings"][1]["label"], "Overtime Pay");
    assert_eq!(alice["summary"]["net_pay_formatted"], "\u{20B1}49,275.57");
    assert_eq!(amount(&alice["summary"]["net_pay"]), amount(&body["rows"][0]["net_pay"]));

    let bob = &payslips[1];
    assert_eq!(bob["earnings"].as_array().unwrap().len(), 1);
    assert!(bob["deductions"].as_array().unwrap().is_empty());
    assert_eq!(amount(&bob["summary"]["net_pay"]), decimal("11000.00"));
}

#[tokio::test]
async fn test_preview_payslips_for_unknown_employee() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 1,
            "rows": [{"employee_id": 77, "basic_salary": "22000", "days_worked": "22"}],
            "payslip_period": {"month": "2025-02", "cycle_type": "MONTHLY"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn test_preview_oversized_row_is_rejected_not_calculated() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({
            "business_id": 1,
            "rows": [{
                "basic_salary": "79228162514264337593543950335",
                "days_worked": "100",
                "overtime_hours": "2500"
            }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["rows[0].basic_salary", "rows[0].overtime_hours"]);
}

#[tokio::test]
async fn test_preview_is_enterprise_only() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[],
        json!({"business_id": 1, "rows": []}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("ENTERPRISE"));
}

#[tokio::test]
async fn test_preview_missing_rows_is_validation_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/preview",
        &[ENTERPRISE],
        json!({"business_id": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("missing field"));
}

// =============================================================================
// SECTION 3: Policies
// =============================================================================

#[tokio::test]
async fn test_policy_lookup_configured_business() {
    let (status, body) = get_json(create_router_for_test(), "/policies/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"]["origin"], "CONFIGURED");
    assert_eq!(body["policy"]["policy_id"], 1);
    assert_eq!(body["policy"]["rates"]["grace_minutes"], 10);
    assert_eq!(amount(&body["policy"]["rates"]["late_penalty_per_minute"]), decimal("2.00"));
}

#[tokio::test]
async fn test_policy_lookup_falls_back_to_default() {
    let (status, body) = get_json(create_router_for_test(), "/policies/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"]["origin"], "DEFAULT");
    assert!(body["policy"]["policy_id"].is_null());
    assert_eq!(warning_codes(&body), vec!["DEFAULT_POLICY"]);
}

fn policy_draft(business: u64) -> Value {
    json!({
        "business": business,
        "grace_minutes": "15",
        "standard_working_days": "26",
        "late_penalty_per_minute": "1.50",
        "undertime_penalty_per_minute": "1.50",
        "absent_penalty_per_day": "750.00",
        "ot_multiplier": "1.25",
        "rest_day_multiplier": "1.30",
        "holiday_regular_multiplier": "2.00",
        "holiday_special_multiplier": "1.30"
    })
}

#[tokio::test]
async fn test_validate_new_policy_for_business_without_one() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/policies/validate",
        &[],
        policy_draft(2),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["business"], 2);
    assert_eq!(body["grace_minutes"], 15);
}

#[tokio::test]
async fn test_validate_rejects_second_policy_for_business() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/policies/validate",
        &[],
        policy_draft(1),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "business");
}

#[tokio::test]
async fn test_validate_allows_editing_existing_policy() {
    let mut draft = policy_draft(1);
    draft["editing_id"] = json!(1);

    let (status, body) =
        post_json(create_router_for_test(), "/policies/validate", &[], draft).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn test_validate_reports_every_bad_field() {
    let mut draft = policy_draft(2);
    draft["grace_minutes"] = json!("1000");
    draft["absent_penalty_per_day"] = json!("750.005");
    draft["ot_multiplier"] = json!("-1.25");

    let (status, body) =
        post_json(create_router_for_test(), "/policies/validate", &[], draft).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["grace_minutes", "absent_penalty_per_day", "ot_multiplier"]
    );
}

// =============================================================================
// SECTION 4: Cutoffs
// =============================================================================

#[tokio::test]
async fn test_cutoff_second_half_clamps_to_month_end() {
    let (status, body) = get_json(
        create_router_for_test(),
        "/cycles/cutoff?business_id=1&month=2025-02&cycle_type=SEMI_2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle_id"], 2);
    assert_eq!(body["cutoff"]["start"], "2025-02-16");
    assert_eq!(body["cutoff"]["end"], "2025-02-28");
}

#[tokio::test]
async fn test_cutoff_wraps_into_next_month() {
    let (status, body) = get_json(
        create_router_for_test(),
        "/cycles/cutoff?business_id=2&month=2025-01-15&cycle_type=monthly",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cutoff"]["start"], "2025-01-26");
    assert_eq!(body["cutoff"]["end"], "2025-02-25");
}

#[tokio::test]
async fn test_cutoff_unknown_cycle_is_not_found() {
    let (status, body) = get_json(
        create_router_for_test(),
        "/cycles/cutoff?business_id=2&month=2025-01&cycle_type=SEMI_1",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CYCLE_NOT_FOUND");
}

#[tokio::test]
async fn test_cutoff_bad_month_is_field_error() {
    let (status, body) = get_json(
        create_router_for_test(),
        "/cycles/cutoff?business_id=1&month=March&cycle_type=MONTHLY",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "month");
}

// =============================================================================
// SECTION 5: Payroll Generation
// =============================================================================

#[tokio::test]
async fn test_generate_monthly_with_mandatories_and_attendance() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[],
        json!({"employee_id": 1, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let generation = &body["generation"];
    assert_eq!(generation["month"], "2025-03-01");
    assert_eq!(generation["employee_name"], "Alice Wonderland");

    // Structure lines; the structure SSS line is replaced by the computed one
    assert_eq!(record_amount(generation, "BASIC"), Some(decimal("30000")));
    assert_eq!(record_amount(generation, "RICE"), Some(decimal("1500")));

    // Mandatories on a 31,500 monthly gross
    assert_eq!(record_amount(generation, "SSS_EE"), Some(decimal("1350.00")));
    assert_eq!(record_amount(generation, "PHIC_EE"), Some(decimal("787.50")));
    assert_eq!(record_amount(generation, "HDMF_EE"), Some(decimal("100.00")));
    assert_eq!(record_amount(generation, "TAX_WHT"), Some(decimal("1685.90")));

    // Attendance: 25 minutes late, 30 minutes undertime, 2h overtime,
    // 3h on a Saturday and one absence; the 5 minutes late is within grace
    assert_eq!(record_amount(generation, "LATE"), Some(decimal("50.00")));
    assert_eq!(record_amount(generation, "UNDERTIME"), Some(decimal("60.00")));
    assert_eq!(record_amount(generation, "OT"), Some(decimal("426.14")));
    assert_eq!(record_amount(generation, "REST_OT"), Some(decimal("664.77")));
    assert_eq!(record_amount(generation, "ABSENT"), Some(decimal("1363.64")));

    let sss_lines = generation["records"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["code"] == "SSS_EE")
        .count();
    assert_eq!(sss_lines, 1);
}

#[tokio::test]
async fn test_generate_semi_monthly_halves_mandatories() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[],
        json!({"employee_id": 1, "month": "2025-03", "cycle_type": "SEMI_1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let generation = &body["generation"];
    assert_eq!(generation["cutoff"]["end"], "2025-03-15");
    assert_eq!(record_amount(generation, "SSS_EE"), Some(decimal("675.00")));
    assert_eq!(record_amount(generation, "TAX_WHT"), Some(decimal("842.95")));
    // The absence on the 17th is outside the first half
    assert_eq!(record_amount(generation, "ABSENT"), None);
}

#[tokio::test]
async fn test_generate_uses_latest_salary_rate() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[],
        json!({"employee_id": 2, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["generation"]["base_salary_used"]), decimal("48000"));
    assert_eq!(record_amount(&body["generation"], "TRANSPO"), Some(decimal("2000")));
}

#[tokio::test]
async fn test_generate_warns_for_default_policy_and_missing_schedule() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[],
        json!({"employee_id": 4, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let generation = &body["generation"];
    assert_eq!(generation["cutoff"]["start"], "2025-03-26");
    assert_eq!(generation["cutoff"]["end"], "2025-04-25");

    let codes: Vec<&str> = generation["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["DEFAULT_POLICY", "NO_SCHEDULE"]);

    // 62,000 gross: taxable 59,000 in the 25% bracket
    assert_eq!(record_amount(generation, "PHIC_EE"), Some(decimal("1550.00")));
    assert_eq!(record_amount(generation, "TAX_WHT"), Some(decimal("8916.75")));
}

#[tokio::test]
async fn test_generate_unknown_employee_is_not_found() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[],
        json!({"employee_id": 99, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn test_generate_before_first_salary_rate_fails() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[],
        json!({"employee_id": 1, "month": "2023-12", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "SALARY_RATE_NOT_FOUND");
}

#[tokio::test]
async fn test_generate_forbidden_for_employee_role() {
    let (status, _) = post_json(
        create_router_for_test(),
        "/payroll/generate",
        &[(ROLE_HEADER, "EMPLOYEE")],
        json!({"employee_id": 1, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// SECTION 6: Batch Generation
// =============================================================================

#[tokio::test]
async fn test_batch_for_business_skips_inactive() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate-batch",
        &[(ROLE_HEADER, "ADMIN")],
        json!({"business_id": 1, "month": "2025-03", "cycle_type": "SEMI_2"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let batch = &body["batch"];
    assert_eq!(batch["processed"], 2);
    assert_eq!(batch["skipped"], json!([3]));
    let statuses: Vec<&str> = batch["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["success", "success"]);
}

#[tokio::test]
async fn test_batch_reports_per_employee_errors() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/generate-batch",
        &[],
        json!({"employee_ids": [1, 42, 4], "month": "2025-03", "cycle_type": "SEMI_1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["batch"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[1]["employee_id"], 42);
    // Wayne Enterprises has no first-half cycle
    assert_eq!(results[2]["status"], "error");
    assert!(results[2]["error"].as_str().unwrap().contains("SEMI_1"));
}

// =============================================================================
// SECTION 7: Payslips
// =============================================================================

#[tokio::test]
async fn test_payslip_preview_balances() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payslips/preview",
        &[],
        json!({"employee_id": 1, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let payslip = &body["payslip"];
    assert_eq!(payslip["employee_name"], "Alice Wonderland");
    assert_eq!(payslip["employee_email"], "alice@example.com");

    let summary = &payslip["summary"];
    assert_eq!(amount(&summary["gross_pay"]), decimal("32590.91"));
    assert_eq!(amount(&summary["total_deductions"]), decimal("5397.04"));
    assert_eq!(amount(&summary["net_pay"]), decimal("27193.87"));
    assert_eq!(
        amount(&summary["net_pay"]),
        amount(&summary["gross_pay"]) - amount(&summary["total_deductions"])
    );
    assert_eq!(summary["net_pay_formatted"], "\u{20B1}27,193.87");

    let earnings = payslip["earnings"].as_array().unwrap();
    assert_eq!(earnings[0]["label"], "Basic Pay");
    assert_eq!(earnings[0]["formatted"], "\u{20B1}30,000.00");
}

// =============================================================================
// SECTION 8: Remote Backend
// =============================================================================

#[tokio::test]
async fn test_backend_down_serves_fallback_with_warning() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.any_request();
            then.status(503).body("maintenance");
        })
        .await;

    let (status, body) =
        get_json(create_router_with_backend(&server.base_url()), "/policies/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data_origin"], "FALLBACK");
    assert_eq!(body["policy"]["origin"], "CONFIGURED");
    assert_eq!(warning_codes(&body), vec!["FALLBACK_DATA"]);
}

#[tokio::test]
async fn test_backend_policies_are_used_when_available() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/payroll/api/policies/")
                .header("Authorization", "Token test-token");
            then.status(200).json_body(json!({
                "count": 1,
                "results": [{
                    "id": 7,
                    "business": 1,
                    "grace_minutes": 5,
                    "standard_working_days": "26",
                    "late_penalty_per_minute": "1.00",
                    "undertime_penalty_per_minute": "1.00",
                    "absent_penalty_per_day": "0.00",
                    "ot_multiplier": "1.50",
                    "rest_day_multiplier": "1.30",
                    "holiday_regular_multiplier": "2.00",
                    "holiday_special_multiplier": "1.30"
                }]
            }));
        })
        .await;

    let (status, body) =
        get_json(create_router_with_backend(&server.base_url()), "/policies/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data_origin"], "REMOTE");
    assert_eq!(body["policy"]["policy_id"], 7);
    assert_eq!(amount(&body["policy"]["rates"]["ot_multiplier"]), decimal("1.50"));
    assert!(warning_codes(&body).is_empty());
}

#[tokio::test]
async fn test_send_single_payslip_through_backend() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/payroll/api/email/send-single-payslip/")
                .json_body_partial(r#"{"employee_id": 1, "month": "2025-03-01"}"#);
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    let (status, body) = post_json(
        create_router_with_backend(&server.base_url()),
        "/payslips/send",
        &[],
        json!({"employee_id": 1, "month": "2025-03", "cycle_type": "MONTHLY"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dispatches"][0]["employee_id"], 1);
    assert_eq!(body["dispatches"][0]["success"], true);
}

#[tokio::test]
async fn test_send_bulk_payslips_reports_each_employee() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/payroll/api/email/send-bulk-payslip/");
            then.status(200).json_body(json!([
                {"employee_id": 1, "success": true, "message_id": "m-1"},
                {"employee_id": 2, "success": false, "error": "no email on file"}
            ]));
        })
        .await;

    let (status, body) = post_json(
        create_router_with_backend(&server.base_url()),
        "/payslips/send",
        &[],
        json!({"business_id": 1, "month": "2025-03"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let dispatches = body["dispatches"].as_array().unwrap();
    assert_eq!(dispatches.len(), 2);
    assert_eq!(dispatches[1]["error"], "no email on file");
}
