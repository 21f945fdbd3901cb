//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AttendanceRecord, Branch, Business, Employee, Holiday, PayrollCycle, PayrollPolicy, PolicyRates,
    Position, SalaryComponent, SalaryRate, SalaryStructure, WorkSchedule,
};

fn default_hours_per_day() -> Decimal {
    Decimal::new(8, 0)
}

/// Engine-wide payroll settings (`settings.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    /// Working hours per day used to derive hourly rates.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
    /// Whether generation computes government mandatories instead of reading
    /// them from salary structures.
    #[serde(default)]
    pub use_mandatories: bool,
    /// Rates used when a business has no configured policy.
    pub default_policy: PolicyRates,
}

/// One progressive withholding tax bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Income above this bound falls in the bracket.
    pub lower_bound: Decimal,
    /// Tax due on income up to the lower bound.
    pub base_tax: Decimal,
    /// Marginal rate on income above the lower bound.
    pub rate: Decimal,
    /// Human-readable description.
    #[serde(default)]
    pub label: String,
}

impl TaxBracket {
    fn new(lower_bound: i64, base_tax_cents: i64, rate_percent: i64, label: &str) -> Self {
        Self {
            lower_bound: Decimal::new(lower_bound, 0),
            base_tax: Decimal::new(base_tax_cents, 2),
            rate: Decimal::new(rate_percent, 2),
            label: label.to_string(),
        }
    }
}

/// Government contribution rates and tax brackets (`mandatories.yaml`).
///
/// Any field left out of the file keeps its built-in value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandatoryRates {
    /// Minimum SSS monthly salary credit.
    pub sss_min_credit: Decimal,
    /// Maximum SSS monthly salary credit.
    pub sss_max_credit: Decimal,
    /// SSS employee share of the salary credit.
    pub sss_ee_share: Decimal,
    /// Minimum PhilHealth premium base.
    pub phic_min_base: Decimal,
    /// Maximum PhilHealth premium base.
    pub phic_max_base: Decimal,
    /// PhilHealth premium rate.
    pub phic_rate: Decimal,
    /// Employee split of the PhilHealth premium.
    pub phic_ee_split: Decimal,
    /// Minimum Pag-IBIG contribution base.
    pub hdmf_min_base: Decimal,
    /// Maximum Pag-IBIG contribution base.
    pub hdmf_max_base: Decimal,
    /// Pag-IBIG rate at or below the threshold.
    pub hdmf_rate_low: Decimal,
    /// Pag-IBIG rate above the threshold.
    pub hdmf_rate_high: Decimal,
    /// Monthly gross separating the low and high Pag-IBIG rates.
    pub hdmf_high_threshold: Decimal,
    /// Monthly withholding tax brackets, ascending by lower bound.
    pub tax_brackets: Vec<TaxBracket>,
}

impl Default for MandatoryRates {
    fn default() -> Self {
        Self {
            sss_min_credit: Decimal::new(4000, 0),
            sss_max_credit: Decimal::new(30000, 0),
            sss_ee_share: Decimal::new(45, 3),
            phic_min_base: Decimal::new(10000, 0),
            phic_max_base: Decimal::new(80000, 0),
            phic_rate: Decimal::new(5, 2),
            phic_ee_split: Decimal::new(50, 2),
            hdmf_min_base: Decimal::new(1000, 0),
            hdmf_max_base: Decimal::new(5000, 0),
            hdmf_rate_low: Decimal::new(1, 2),
            hdmf_rate_high: Decimal::new(2, 2),
            hdmf_high_threshold: Decimal::new(1500, 0),
            tax_brackets: vec![
                TaxBracket::new(0, 0, 0, "Exempt up to 20,833"),
                TaxBracket::new(20_833, 0, 20, "Over 20,833 up to 33,333"),
                TaxBracket::new(33_333, 250_000, 25, "Over 33,333 up to 66,667"),
                TaxBracket::new(66_667, 1_083_333, 30, "Over 66,667 up to 166,667"),
                TaxBracket::new(166_667, 4_083_333, 32, "Over 166,667 up to 666,667"),
                TaxBracket::new(666_667, 20_083_333, 35, "Over 666,667"),
            ],
        }
    }
}

/// The records a payroll run reads.
///
/// `fallback.yaml` holds the stub copy served when the backend is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PayrollDataset {
    /// Businesses.
    pub businesses: Vec<Business>,
    /// Branches.
    pub branches: Vec<Branch>,
    /// Positions.
    pub positions: Vec<Position>,
    /// Employees.
    pub employees: Vec<Employee>,
    /// Payroll policies.
    pub policies: Vec<PayrollPolicy>,
    /// Holidays.
    pub holidays: Vec<Holiday>,
    /// Salary components.
    pub components: Vec<SalaryComponent>,
    /// Salary structure lines.
    pub structures: Vec<SalaryStructure>,
    /// Payroll cycles.
    pub cycles: Vec<PayrollCycle>,
    /// Salary rates.
    pub salary_rates: Vec<SalaryRate>,
    /// Branch work schedules.
    pub schedules: Vec<WorkSchedule>,
    /// Attendance records.
    pub attendance: Vec<AttendanceRecord>,
}
