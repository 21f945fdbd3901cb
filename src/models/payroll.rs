//! Generated payroll line items.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStep, AuditWarning, ComponentId, ComponentType, Cutoff, CycleType, EmployeeId};

/// Where a generated payroll record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordSource {
    /// A position salary-structure component.
    Structure,
    /// A computed government contribution or withholding tax.
    Mandatory,
    /// A component derived from attendance (late, OT, absences...).
    TimeAnalysis,
    /// A 13th-month pay line.
    ThirteenthMonth,
}

/// One payroll line for an employee in a month and cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// The employee the record belongs to.
    pub employee_id: EmployeeId,
    /// First day of the payroll month.
    pub month: NaiveDate,
    /// The salary component this line is for.
    pub component_id: ComponentId,
    /// Component code, if the component has one.
    #[serde(default)]
    pub code: Option<String>,
    /// Component display name.
    pub component_name: String,
    /// Whether the line adds to or deducts from pay.
    pub component_type: ComponentType,
    /// Line amount, rounded to cents.
    pub amount: Decimal,
    /// How the line was produced.
    pub source: RecordSource,
}

impl PayrollRecord {
    /// Returns true for earning lines.
    pub fn is_earning(&self) -> bool {
        self.component_type == ComponentType::Earning
    }
}

/// The result of generating payroll for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollGeneration {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The employee's display name.
    pub employee_name: String,
    /// First day of the payroll month.
    pub month: NaiveDate,
    /// The cycle the payroll was generated for.
    pub cycle_type: CycleType,
    /// The attendance window used for time analysis.
    pub cutoff: Cutoff,
    /// The monthly basic salary found for the month.
    pub base_salary_used: Decimal,
    /// Generated lines in generation order.
    pub records: Vec<PayrollRecord>,
    /// How each figure was derived.
    pub audit_steps: Vec<AuditStep>,
    /// Non-fatal issues found while generating.
    pub warnings: Vec<AuditWarning>,
}

impl PayrollGeneration {
    /// Sum of all earning lines.
    pub fn total_earnings(&self) -> Decimal {
        self.records
            .iter()
            .filter(|r| r.is_earning())
            .map(|r| r.amount)
            .sum()
    }

    /// Sum of all deduction lines.
    pub fn total_deductions(&self) -> Decimal {
        self.records
            .iter()
            .filter(|r| !r.is_earning())
            .map(|r| r.amount)
            .sum()
    }
}
