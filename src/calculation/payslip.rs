//! Payslip assembly.
//!
//! Builds a [`PayslipView`] either from a net pay calculation or from
//! generated payroll records. Totals are summed from the cent-rounded line
//! amounts, so `net_pay == gross_pay - total_deductions` holds exactly.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::money::{format_peso, round_money};
use super::net_pay::NetPayResult;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Cutoff, CycleType, Employee, PayrollGeneration, PayrollRecord, PayslipLine, PayslipSummary,
    PayslipView,
};

fn line(label: impl Into<String>, code: Option<&str>, amount: Decimal) -> PayslipLine {
    let amount = round_money(amount);
    PayslipLine {
        label: label.into(),
        code: code.map(str::to_string),
        amount,
        formatted: format_peso(amount),
    }
}

fn summarize(earnings: &[PayslipLine], deductions: &[PayslipLine]) -> PayslipSummary {
    let gross_pay: Decimal = earnings.iter().map(|l| l.amount).sum();
    let total_deductions: Decimal = deductions.iter().map(|l| l.amount).sum();
    let net_pay = gross_pay - total_deductions;

    PayslipSummary {
        gross_pay,
        total_deductions,
        net_pay,
        gross_pay_formatted: format_peso(gross_pay),
        total_deductions_formatted: format_peso(total_deductions),
        net_pay_formatted: format_peso(net_pay),
    }
}

/// Assembles a payslip from a net pay calculation.
///
/// Earnings are the pay for days worked and, when non-zero, overtime;
/// deductions are the single deductions figure when non-zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{assemble_payslip, calculate_net_pay, NetPayInput};
/// use payroll_engine::models::{Cutoff, CycleType, Employee, PolicyRates};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: 1,
///     first_name: "Alice".to_string(),
///     last_name: "Wonderland".to_string(),
///     email: None,
///     phone: None,
///     position_id: Some(1),
///     branch_id: Some(1),
///     hire_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
///     active: true,
/// };
/// let input = NetPayInput {
///     basic_salary: Decimal::new(50000, 0),
///     days_worked: Decimal::new(22, 0),
///     overtime_hours: Decimal::new(5, 0),
///     deductions: Decimal::new(2500, 0),
/// };
/// let result = calculate_net_pay(&input, &PolicyRates::default()).unwrap();
/// let period = Cutoff {
///     start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
/// };
///
/// let payslip = assemble_payslip(&employee, period.start, period, CycleType::Monthly, &result);
/// assert!(payslip.verify());
/// assert_eq!(payslip.summary.net_pay_formatted, "\u{20B1}49,275.57");
/// ```
pub fn assemble_payslip(
    employee: &Employee,
    month: NaiveDate,
    period: Cutoff,
    cycle_type: CycleType,
    result: &NetPayResult,
) -> PayslipView {
    let mut earnings = vec![line(
        "Basic Pay",
        Some("BASIC"),
        result.gross_for_days_worked,
    )];
    if !result.overtime_pay.is_zero() {
        earnings.push(line("Overtime Pay", Some("OT"), result.overtime_pay));
    }

    let deductions = if result.total_deductions.is_zero() {
        Vec::new()
    } else {
        vec![line("Deductions", None, result.total_deductions)]
    };

    let summary = summarize(&earnings, &deductions);

    PayslipView {
        employee_id: employee.id,
        employee_name: employee.full_name(),
        employee_email: employee.email.clone(),
        month,
        cycle_type,
        period,
        earnings,
        deductions,
        summary,
    }
}

/// Assembles a payslip from generated payroll records.
///
/// Lines keep the record order. Fails when a record belongs to another
/// employee.
pub fn assemble_from_records(
    employee: &Employee,
    generation: &PayrollGeneration,
) -> EngineResult<PayslipView> {
    if let Some(stray) = generation
        .records
        .iter()
        .find(|r| r.employee_id != employee.id)
    {
        return Err(EngineError::InvalidInput {
            field: "records".to_string(),
            message: format!(
                "record for employee {} cannot appear on the payslip of employee {}",
                stray.employee_id, employee.id
            ),
        });
    }

    let (earning_records, deduction_records): (Vec<_>, Vec<_>) =
        generation.records.iter().partition(|r| r.is_earning());

    let to_lines = |records: Vec<&PayrollRecord>| -> Vec<PayslipLine> {
        records
            .into_iter()
            .map(|r| line(r.component_name.clone(), r.code.as_deref(), r.amount))
            .collect()
    };
    let earnings = to_lines(earning_records);
    let deductions = to_lines(deduction_records);
    let summary = summarize(&earnings, &deductions);

    Ok(PayslipView {
        employee_id: employee.id,
        employee_name: employee.full_name(),
        employee_email: employee.email.clone(),
        month: generation.month,
        cycle_type: generation.cycle_type,
        period: generation.cutoff,
        earnings,
        deductions,
        summary,
    })
}
