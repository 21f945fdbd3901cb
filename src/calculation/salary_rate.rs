//! Active salary rate selection.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult, FieldError};
use crate::models::{AuditStep, EmployeeId, SalaryRate};

/// The salary rate found for an employee on a date.
#[derive(Debug, Clone)]
pub struct SalaryLookupResult {
    /// The monthly basic salary.
    pub amount: Decimal,
    /// The start date of the rate that was used.
    pub effective_from: NaiveDate,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Finds the employee's basic salary on `date`.
///
/// Among the rates whose window contains `date`, the one with the latest
/// `start_date` wins, so an overlapping newer rate supersedes an older
/// open-ended one.
///
/// # Errors
///
/// Returns [`EngineError::SalaryRateNotFound`] if no rate covers the date.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::salary_for_date;
/// use payroll_engine::models::SalaryRate;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rates = vec![
///     SalaryRate {
///         employee_id: 1,
///         amount: Decimal::new(45000, 0),
///         start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         end_date: None,
///     },
///     SalaryRate {
///         employee_id: 1,
///         amount: Decimal::new(50000, 0),
///         start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///         end_date: None,
///     },
/// ];
///
/// let found = salary_for_date(&rates, 1, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 1).unwrap();
/// assert_eq!(found.amount, Decimal::new(50000, 0));
/// ```
pub fn salary_for_date(
    rates: &[SalaryRate],
    employee_id: EmployeeId,
    date: NaiveDate,
    step_number: u32,
) -> EngineResult<SalaryLookupResult> {
    let rate = rates
        .iter()
        .filter(|r| r.employee_id == employee_id && r.is_active_on(date))
        .max_by_key(|r| r.start_date)
        .ok_or(EngineError::SalaryRateNotFound { employee_id, date })?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "salary_rate_lookup".to_string(),
        rule_name: "Salary Rate Lookup".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "date": date.to_string()
        }),
        output: serde_json::json!({
            "amount": rate.amount.to_string(),
            "start_date": rate.start_date.to_string(),
            "end_date": rate.end_date.map(|d| d.to_string())
        }),
        reasoning: format!(
            "Using salary rate {} effective {} for {}",
            rate.amount, rate.start_date, date
        ),
    };

    Ok(SalaryLookupResult {
        amount: rate.amount,
        effective_from: rate.start_date,
        audit_step,
    })
}

/// Rejects rates whose window is inverted or whose amount is negative.
pub fn validate_salary_rate(rate: &SalaryRate) -> EngineResult<()> {
    let mut errors = Vec::new();
    if rate.amount < Decimal::ZERO {
        errors.push(FieldError::new("amount", "cannot be negative"));
    }
    if let Some(end) = rate.end_date {
        if rate.start_date > end {
            errors.push(FieldError::new(
                "end_date",
                format!("must not be before start date {}", rate.start_date),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation { errors })
    }
}
