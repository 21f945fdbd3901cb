//! Request types for the payroll API.
//!
//! Months are accepted as `YYYY-MM` or `YYYY-MM-DD` strings and normalized
//! to the first day of the month by the handlers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::NetPayInput;
use crate::models::{BranchId, BusinessId, CycleType, EmployeeId, PolicyId};
use crate::policy::PolicyDraft;

/// Request body for `POST /payroll/preview`.
///
/// With `payslip_period`, a payslip is assembled for every row; each row
/// then needs an `employee_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Business whose policy applies; the default policy is used when it has none.
    pub business_id: BusinessId,
    /// Rows to calculate.
    pub rows: Vec<PreviewRow>,
    /// Period to print on per-row payslips.
    #[serde(default)]
    pub payslip_period: Option<PayslipPeriod>,
}

/// One employee's row of the preview table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRow {
    /// The employee the row is for, needed for payslips.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
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

impl PreviewRow {
    /// The calculator input for the row.
    pub fn input(&self) -> NetPayInput {
        NetPayInput {
            basic_salary: self.basic_salary,
            days_worked: self.days_worked,
            overtime_hours: self.overtime_hours,
            deductions: self.deductions,
        }
    }
}

/// The payroll month and cycle a preview payslip covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipPeriod {
    /// The payroll month.
    pub month: String,
    /// The cycle whose cutoff is printed.
    pub cycle_type: CycleType,
}

/// Request body for `POST /policies/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePolicyRequest {
    /// The policy as entered.
    #[serde(flatten)]
    pub draft: PolicyDraft,
    /// Id of the policy being edited, if this is an edit.
    #[serde(default)]
    pub editing_id: Option<PolicyId>,
}

/// Query parameters for `GET /cycles/cutoff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffQuery {
    /// The business.
    pub business_id: BusinessId,
    /// The payroll month.
    pub month: String,
    /// The cycle type, e.g. `SEMI_1`.
    pub cycle_type: String,
}

/// Request body for `POST /payroll/generate` and `POST /payslips/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The payroll month.
    pub month: String,
    /// The cycle to generate.
    pub cycle_type: CycleType,
}

/// Request body for `POST /payroll/generate-batch`.
///
/// Without `employee_ids` every employee is included, limited to the
/// business when `business_id` is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Employees to include.
    #[serde(default)]
    pub employee_ids: Option<Vec<EmployeeId>>,
    /// Business filter when `employee_ids` is absent.
    #[serde(default)]
    pub business_id: Option<BusinessId>,
    /// The payroll month.
    pub month: String,
    /// The cycle to generate.
    pub cycle_type: CycleType,
}

/// Request body for `POST /payslips/send`.
///
/// With `employee_id` one payslip is sent; otherwise every payslip of the
/// business or branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendPayslipsRequest {
    /// The employee for a single send.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    /// The business for a bulk send.
    #[serde(default)]
    pub business_id: Option<BusinessId>,
    /// The branch for a bulk send.
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    /// The payroll month.
    pub month: String,
    /// The cycle the payslips cover.
    #[serde(default)]
    pub cycle_type: Option<CycleType>,
}
