//! Payslip view model.
//!
//! A [`PayslipView`] is derived and never persisted. It carries both the raw
//! decimal figures and their peso-formatted strings so print and email
//! consumers don't re-derive anything.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Cutoff, CycleType, EmployeeId};

/// An itemized payslip line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLine {
    /// Line label.
    pub label: String,
    /// Component code, if any.
    #[serde(default)]
    pub code: Option<String>,
    /// Amount, rounded to cents.
    pub amount: Decimal,
    /// Amount formatted for display (e.g. `₱1,234.56`).
    pub formatted: String,
}

/// Gross, deduction and net totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipSummary {
    /// Sum of earning lines.
    pub gross_pay: Decimal,
    /// Sum of deduction lines.
    pub total_deductions: Decimal,
    /// `gross_pay - total_deductions`.
    pub net_pay: Decimal,
    /// Formatted gross pay.
    pub gross_pay_formatted: String,
    /// Formatted total deductions.
    pub total_deductions_formatted: String,
    /// Formatted net pay.
    pub net_pay_formatted: String,
}

/// A display-ready payslip for one employee, period and cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipView {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The employee's display name.
    pub employee_name: String,
    /// Email the payslip would be delivered to.
    pub employee_email: Option<String>,
    /// First day of the payroll month.
    pub month: NaiveDate,
    /// The payroll cycle.
    pub cycle_type: CycleType,
    /// The concrete pay period.
    pub period: Cutoff,
    /// Earning lines.
    pub earnings: Vec<PayslipLine>,
    /// Deduction lines.
    pub deductions: Vec<PayslipLine>,
    /// Totals.
    pub summary: PayslipSummary,
}

impl PayslipView {
    /// Re-checks the totals against the itemized lines.
    ///
    /// Returns true when gross equals the sum of earnings, deductions equal
    /// the sum of deduction lines, and net equals gross minus deductions,
    /// all exact to the cent.
    pub fn verify(&self) -> bool {
        let earnings: Decimal = self.earnings.iter().map(|l| l.amount).sum();
        let deductions: Decimal = self.deductions.iter().map(|l| l.amount).sum();
        earnings == self.summary.gross_pay
            && deductions == self.summary.total_deductions
            && self.summary.net_pay == self.summary.gross_pay - self.summary.total_deductions
    }
}
