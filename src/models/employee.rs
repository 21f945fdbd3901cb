//! Employee model and salary rates.
//!
//! This module defines the [`Employee`] struct and the [`SalaryRate`] validity
//! window used to find an employee's basic salary on a given date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BranchId, EmployeeId, PositionId};

fn default_active() -> bool {
    true
}

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email, used for payslip distribution.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// The position the employee holds.
    #[serde(rename = "position", default)]
    pub position_id: Option<PositionId>,
    /// The branch the employee is assigned to.
    #[serde(rename = "branch", default)]
    pub branch_id: Option<BranchId>,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Whether the employee is currently active.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Employee {
    /// Returns the employee's display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     first_name: "Alice".to_string(),
    ///     last_name: "Wonderland".to_string(),
    ///     email: None,
    ///     phone: None,
    ///     position_id: Some(1),
    ///     branch_id: Some(1),
    ///     hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    ///     active: true,
    /// };
    /// assert_eq!(employee.full_name(), "Alice Wonderland");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A basic salary amount valid over a date range.
///
/// `end_date` of `None` means the rate is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRate {
    /// The employee the rate belongs to.
    #[serde(rename = "employee")]
    pub employee_id: EmployeeId,
    /// Monthly basic salary.
    pub amount: Decimal,
    /// First day the rate applies (inclusive).
    pub start_date: NaiveDate,
    /// Last day the rate applies (inclusive), if bounded.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl SalaryRate {
    /// Returns true if the rate is in effect on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }
}
