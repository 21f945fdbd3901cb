//! Net pay calculation for the payroll preview.
//!
//! This module turns a basic salary, days worked, overtime hours and a flat
//! deduction amount into gross pay, overtime pay and net pay.
//!
//! ## Formula
//!
//! - `daily_rate = basic_salary / standard_working_days`
//! - `gross_for_days_worked = daily_rate × days_worked`
//! - `hourly_rate = daily_rate / hours_per_day`
//! - `overtime_pay = hourly_rate × ot_multiplier × overtime_hours`
//! - `gross_pay = gross_for_days_worked + overtime_pay`
//! - `net_pay = gross_pay - deductions`
//!
//! Rates keep full precision; each reported figure is rounded to cents and
//! the totals are built from the rounded figures so that
//! `net_pay == gross_pay - total_deductions` holds exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{
    checked_product, checked_quotient, checked_total, max_digits_before, round_money,
};
use crate::error::{EngineError, EngineResult, FieldError};
use crate::models::{AuditStep, PolicyRates};

/// Inputs for one employee's payroll preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPayInput {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Days worked in the period.
    pub days_worked: Decimal,
    /// Overtime hours worked in the period.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Flat deductions for the period.
    #[serde(default)]
    pub deductions: Decimal,
}

/// The result of a net pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPayResult {
    /// Basic salary per working day, rounded to cents.
    pub daily_rate: Decimal,
    /// Daily rate per working hour, rounded to cents.
    pub hourly_rate: Decimal,
    /// Hourly rate with the overtime multiplier, rounded to cents.
    pub overtime_rate: Decimal,
    /// Pay for the days worked.
    pub gross_for_days_worked: Decimal,
    /// Pay for the overtime hours.
    pub overtime_pay: Decimal,
    /// `gross_for_days_worked + overtime_pay`.
    pub gross_pay: Decimal,
    /// Deductions rounded to cents.
    pub total_deductions: Decimal,
    /// `gross_pay - total_deductions`.
    pub net_pay: Decimal,
    /// Audit steps recording each stage of the calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// Checks a preview input at the boundary, before any computation.
///
/// Every failing field is reported. Values must be non-negative and fit the
/// backend's columns:
///
/// | Field | Digits before the point |
/// |---|---|
/// | `basic_salary` | 8 |
/// | `days_worked` | 3 |
/// | `overtime_hours` | 3 |
/// | `deductions` | 10 |
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{validate_net_pay_input, NetPayInput};
/// use rust_decimal::Decimal;
///
/// let mut input = NetPayInput {
///     basic_salary: Decimal::new(50000, 0),
///     days_worked: Decimal::new(-1, 0),
///     overtime_hours: Decimal::ZERO,
///     deductions: Decimal::ZERO,
/// };
/// assert!(validate_net_pay_input(&input).is_err());
///
/// input.days_worked = Decimal::new(22, 0);
/// input.basic_salary = Decimal::new(1_000_000_000, 0);
/// assert!(validate_net_pay_input(&input).is_err());
/// ```
pub fn validate_net_pay_input(input: &NetPayInput) -> EngineResult<()> {
    let fields = [
        ("basic_salary", input.basic_salary, 8),
        ("days_worked", input.days_worked, 3),
        ("overtime_hours", input.overtime_hours, 3),
        ("deductions", input.deductions, 10),
    ];

    let errors: Vec<FieldError> = fields
        .iter()
        .filter_map(|(field, value, max_digits)| {
            if value.is_sign_negative() && !value.is_zero() {
                Some(FieldError::new(*field, "cannot be negative"))
            } else if !max_digits_before(*value, *max_digits) {
                Some(FieldError::new(
                    *field,
                    format!("must have at most {} digits before the decimal point", max_digits),
                ))
            } else {
                None
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation { errors })
    }
}

/// Calculates gross and net pay for a preview row.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when `standard_working_days` or
/// `hours_per_day` is zero (or negative), and
/// [`EngineError::CalculationError`] when a figure overflows.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{calculate_net_pay, NetPayInput};
/// use payroll_engine::models::PolicyRates;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let input = NetPayInput {
///     basic_salary: Decimal::from_str("50000").unwrap(),
///     days_worked: Decimal::from_str("22").unwrap(),
///     overtime_hours: Decimal::from_str("5").unwrap(),
///     deductions: Decimal::from_str("2500").unwrap(),
/// };
///
/// let result = calculate_net_pay(&input, &PolicyRates::default()).unwrap();
/// assert_eq!(result.daily_rate, Decimal::from_str("2272.73").unwrap());
/// assert_eq!(result.gross_for_days_worked, Decimal::from_str("50000.00").unwrap());
/// assert_eq!(result.overtime_pay, Decimal::from_str("1775.57").unwrap());
/// assert_eq!(result.net_pay, Decimal::from_str("49275.57").unwrap());
/// ```
pub fn calculate_net_pay(input: &NetPayInput, rates: &PolicyRates) -> EngineResult<NetPayResult> {
    if rates.standard_working_days <= Decimal::ZERO {
        return Err(EngineError::Configuration {
            message: format!(
                "standard working days must be greater than zero (got {})",
                rates.standard_working_days
            ),
        });
    }
    if rates.hours_per_day <= Decimal::ZERO {
        return Err(EngineError::Configuration {
            message: format!(
                "hours per day must be greater than zero (got {})",
                rates.hours_per_day
            ),
        });
    }

    let mut audit_steps = Vec::with_capacity(5);

    let daily_rate = checked_quotient(input.basic_salary, rates.standard_working_days)?;
    audit_steps.push(AuditStep {
        step_number: 1,
        rule_id: "daily_rate".to_string(),
        rule_name: "Daily Rate".to_string(),
        input: serde_json::json!({
            "basic_salary": input.basic_salary.to_string(),
            "standard_working_days": rates.standard_working_days.to_string()
        }),
        output: serde_json::json!({
            "daily_rate": round_money(daily_rate).to_string()
        }),
        reasoning: format!(
            "{} / {} working days = {}",
            input.basic_salary,
            rates.standard_working_days,
            round_money(daily_rate)
        ),
    });

    let gross_for_days_worked = round_money(checked_product(daily_rate, input.days_worked)?);
    audit_steps.push(AuditStep {
        step_number: 2,
        rule_id: "days_worked_pay".to_string(),
        rule_name: "Pay for Days Worked".to_string(),
        input: serde_json::json!({
            "daily_rate": round_money(daily_rate).to_string(),
            "days_worked": input.days_worked.to_string()
        }),
        output: serde_json::json!({
            "gross_for_days_worked": gross_for_days_worked.to_string()
        }),
        reasoning: format!(
            "{} days × {} = {}",
            input.days_worked,
            round_money(daily_rate),
            gross_for_days_worked
        ),
    });

    let hourly_rate = checked_quotient(daily_rate, rates.hours_per_day)?;
    let overtime_rate = checked_product(hourly_rate, rates.ot_multiplier)?;
    let overtime_pay = round_money(checked_product(overtime_rate, input.overtime_hours)?);
    audit_steps.push(AuditStep {
        step_number: 3,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        input: serde_json::json!({
            "hourly_rate": round_money(hourly_rate).to_string(),
            "ot_multiplier": rates.ot_multiplier.to_string(),
            "overtime_hours": input.overtime_hours.to_string()
        }),
        output: serde_json::json!({
            "overtime_rate": round_money(overtime_rate).to_string(),
            "overtime_pay": overtime_pay.to_string()
        }),
        reasoning: format!(
            "{} hours × ({} / {} hours × {}) = {}",
            input.overtime_hours,
            round_money(daily_rate),
            rates.hours_per_day,
            rates.ot_multiplier,
            overtime_pay
        ),
    });

    let gross_pay = checked_total(gross_for_days_worked, overtime_pay)?;
    audit_steps.push(AuditStep {
        step_number: 4,
        rule_id: "gross_pay".to_string(),
        rule_name: "Gross Pay".to_string(),
        input: serde_json::json!({
            "gross_for_days_worked": gross_for_days_worked.to_string(),
            "overtime_pay": overtime_pay.to_string()
        }),
        output: serde_json::json!({ "gross_pay": gross_pay.to_string() }),
        reasoning: format!(
            "{} + {} = {}",
            gross_for_days_worked, overtime_pay, gross_pay
        ),
    });

    let total_deductions = round_money(input.deductions);
    let net_pay = gross_pay - total_deductions;
    audit_steps.push(AuditStep {
        step_number: 5,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_deductions": total_deductions.to_string()
        }),
        output: serde_json::json!({ "net_pay": net_pay.to_string() }),
        reasoning: format!("{} - {} = {}", gross_pay, total_deductions, net_pay),
    });

    Ok(NetPayResult {
        daily_rate: round_money(daily_rate),
        hourly_rate: round_money(hourly_rate),
        overtime_rate: round_money(overtime_rate),
        gross_for_days_worked,
        overtime_pay,
        gross_pay,
        total_deductions,
        net_pay,
        audit_steps,
    })
}

/// Recalculates every preview row with the same policy rates.
///
/// Stops at the first configuration error, since it applies to every row.
pub fn recalculate_all(
    inputs: &[NetPayInput],
    rates: &PolicyRates,
) -> EngineResult<Vec<NetPayResult>> {
    inputs
        .iter()
        .map(|input| calculate_net_pay(input, rates))
        .collect()
}
