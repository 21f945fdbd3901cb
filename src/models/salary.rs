//! Salary components and structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ComponentId, PositionId};

/// Whether a component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    /// Adds to gross pay.
    Earning,
    /// Subtracted from gross pay.
    Deduction,
}

/// A named payroll line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Unique identifier for the component.
    pub id: ComponentId,
    /// Display name.
    pub name: String,
    /// Stable code (e.g. "BASIC", "OT", "SSS_EE").
    #[serde(default)]
    pub code: Option<String>,
    /// Earning or deduction.
    pub component_type: ComponentType,
    /// Whether the amount is taxable.
    #[serde(default)]
    pub is_taxable: bool,
}

impl SalaryComponent {
    /// Returns true if the component's code equals `code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

/// Links a position to a component with a fixed amount or a percentage of base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// The position the line belongs to.
    #[serde(rename = "position")]
    pub position_id: PositionId,
    /// The component paid or deducted.
    #[serde(rename = "component")]
    pub component_id: ComponentId,
    /// Fixed amount, or percentage when `is_percentage` is set.
    pub amount: Decimal,
    /// Interpret `amount` as a percentage of base salary.
    #[serde(default)]
    pub is_percentage: bool,
}
